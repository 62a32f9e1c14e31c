mod gradient;
mod linear;
mod logistic;
mod problem;

pub use gradient::Gradient;
pub use linear::LinearRegression;
pub use logistic::LogisticRegression;
pub use problem::Problem;
