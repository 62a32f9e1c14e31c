use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use log::info;

use super::{Dataset, SparseVector};
use crate::error::{Error, Result};

const HEADER: &str = "num_features";

impl Dataset {
    /// Loads a dataset from a text file.
    ///
    /// See [`Dataset::from_reader`] for the format.
    ///
    /// # Arguments
    /// * `path` - The path of the file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let dataset = Self::from_reader(BufReader::new(file))?;

        info!(
            samples = dataset.num_samples(),
            features = dataset.num_features(),
            max_sparsity = dataset.max_sparsity();
            "dataset loaded from {}", path.display()
        );

        Ok(dataset)
    }

    /// Parses a dataset with one sample per line: `label index:value index:value ...`.
    ///
    /// Indices are 0-based. Blank lines and lines starting with `#` are skipped, except
    /// for an optional `# num_features <n>` header which fixes the dimensionality. When
    /// absent, the dimensionality is the largest index found plus one.
    ///
    /// # Arguments
    /// * `reader` - The source of the lines.
    ///
    /// # Returns
    /// A `Parse` error pointing at the offending line, or a `FeatureOutOfRange` if the
    /// header is present and some index exceeds it.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut declared = None;
        let mut features = Vec::new();
        let mut labels = Vec::new();

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let lineno = i + 1;
            let line = line.trim();

            if line.is_empty() {
                continue;
            }

            if let Some(comment) = line.strip_prefix('#') {
                if let Some(n) = parse_header(comment, lineno)? {
                    declared = Some(n);
                }
                continue;
            }

            let (x, y) = parse_sample(line, lineno)?;
            features.push(x);
            labels.push(y);
        }

        let num_features = declared.unwrap_or_else(|| {
            features
                .iter()
                .filter_map(SparseVector::max_index)
                .max()
                .map_or(0, |i| i + 1)
        });

        Dataset::new(features, labels, num_features)
    }
}

fn parse_header(comment: &str, lineno: usize) -> Result<Option<usize>> {
    let mut tokens = comment.split_whitespace();

    if tokens.next() != Some(HEADER) {
        return Ok(None);
    }

    let n = tokens
        .next()
        .and_then(|t| t.parse().ok())
        .ok_or_else(|| Error::Parse {
            line: lineno,
            msg: format!("expected `# {HEADER} <n>`"),
        })?;

    Ok(Some(n))
}

fn parse_sample(line: &str, lineno: usize) -> Result<(SparseVector, f64)> {
    let parse_err = |msg: String| Error::Parse { line: lineno, msg };
    let mut tokens = line.split_whitespace();

    let label = tokens.next().unwrap_or_default();
    let label = label
        .parse()
        .map_err(|_| parse_err(format!("invalid label `{label}`")))?;

    let mut x = SparseVector::new();

    for token in tokens {
        let (index, value) = token
            .split_once(':')
            .ok_or_else(|| parse_err(format!("expected `index:value`, got `{token}`")))?;

        let index = index
            .parse()
            .map_err(|_| parse_err(format!("invalid index `{index}`")))?;

        let value = value
            .parse()
            .map_err(|_| parse_err(format!("invalid value `{value}`")))?;

        x.push(index, value);
    }

    Ok((x, label))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn infers_dimensionality() {
        let src = "1.5 0:1 3:-2\n\n# a comment\n-1 2:0.5\n";
        let dataset = Dataset::from_reader(Cursor::new(src)).unwrap();

        assert_eq!(dataset.num_samples(), 2);
        assert_eq!(dataset.num_features(), 4);

        let (x, y) = dataset.sample(0);
        assert_eq!(y, 1.5);
        assert_eq!(x, &SparseVector::from_pairs([(0, 1.), (3, -2.)]));
    }

    #[test]
    fn header_fixes_dimensionality() {
        let src = "# num_features 10\n0 1:1\n";
        let dataset = Dataset::from_reader(Cursor::new(src)).unwrap();

        assert_eq!(dataset.num_features(), 10);
    }

    #[test]
    fn header_rejects_larger_indices() {
        let src = "# num_features 2\n0 1:1\n0 2:1\n";
        let err = Dataset::from_reader(Cursor::new(src)).unwrap_err();

        assert!(matches!(err, Error::FeatureOutOfRange { sample: 1, index: 2, .. }));
    }

    #[test]
    fn reports_offending_line() {
        let src = "0 1:1\n1 2-3\n";
        let err = Dataset::from_reader(Cursor::new(src)).unwrap_err();

        assert!(matches!(err, Error::Parse { line: 2, .. }));
    }

    #[test]
    fn label_only_samples_are_empty() {
        let dataset = Dataset::from_reader(Cursor::new("3\n")).unwrap();

        assert_eq!(dataset.num_features(), 0);
        assert!(dataset.sample(0).0.is_empty());
    }
}
