//! Reference Statistics
//!
//! Scaling parameters and categorical vocabularies fitted once from the
//! historical house dataset. Immutable after construction.

use crate::error::FeatureError;
use crate::schema::{CategoricalField, FeatureSlot, NumericField, FEATURE_SCHEMA};
use serde::Serialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Mean and population standard deviation of a numeric column
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScalingParams {
    pub mean: f64,
    pub std: f64,
}

impl ScalingParams {
    /// Fit from raw values; the std divides by n, not n - 1
    pub fn fit(column: &'static str, values: &[f64]) -> Result<Self, FeatureError> {
        if values.is_empty() {
            return Err(FeatureError::EmptyDataset(column.to_string()));
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
        let std = variance.sqrt();

        if !std.is_finite() || std == 0.0 {
            return Err(FeatureError::DegenerateScale { column, std });
        }

        Ok(Self { mean, std })
    }

    /// Standardize a value
    pub fn scale(&self, value: f64) -> f64 {
        (value - self.mean) / self.std
    }
}

/// Sorted distinct labels of a categorical column
///
/// The first label is the reference category and gets no indicator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Vocabulary {
    labels: Vec<String>,
}

impl Vocabulary {
    /// Fit from raw labels
    pub fn fit<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        labels.sort();
        labels.dedup();
        Self { labels }
    }

    /// All labels, reference first
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// The dropped reference category
    pub fn reference(&self) -> Option<&str> {
        self.labels.first().map(String::as_str)
    }

    /// Labels that get an indicator column
    pub fn indicators(&self) -> &[String] {
        self.labels.get(1..).unwrap_or(&[])
    }

    /// Whether `label` was seen during fitting
    pub fn contains(&self, label: &str) -> bool {
        self.labels.binary_search_by(|l| l.as_str().cmp(label)).is_ok()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Fitted preprocessing state shared by every request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceStatistics {
    area: ScalingParams,
    year_built: ScalingParams,
    location: Vocabulary,
    garage: Vocabulary,
    condition: Vocabulary,
}

impl ReferenceStatistics {
    /// Assemble from already fitted parts
    pub fn new(
        area: ScalingParams,
        year_built: ScalingParams,
        location: Vocabulary,
        garage: Vocabulary,
        condition: Vocabulary,
    ) -> Self {
        Self {
            area,
            year_built,
            location,
            garage,
            condition,
        }
    }

    /// Fit from dataset files on disk
    pub fn load(scaling_path: &Path, vocabulary_path: &Path) -> Result<Self, FeatureError> {
        info!(
            "Loading reference statistics: scaling={}, vocabulary={}",
            scaling_path.display(),
            vocabulary_path.display()
        );
        let scaling = open(scaling_path)?;
        let vocabulary = open(vocabulary_path)?;
        Self::from_readers(
            scaling,
            &scaling_path.display().to_string(),
            vocabulary,
            &vocabulary_path.display().to_string(),
        )
    }

    /// Fit from CSV readers; names are only used in error messages
    pub fn from_readers<S: Read, V: Read>(
        scaling: S,
        scaling_name: &str,
        vocabulary: V,
        vocabulary_name: &str,
    ) -> Result<Self, FeatureError> {
        let numeric = read_columns(
            scaling,
            scaling_name,
            &[NumericField::Area.column(), NumericField::YearBuilt.column()],
        )?;
        let categorical = read_columns(
            vocabulary,
            vocabulary_name,
            &[
                CategoricalField::Location.column(),
                CategoricalField::Garage.column(),
                CategoricalField::Condition.column(),
            ],
        )?;

        let stats = Self::new(
            fit_scaling(&numeric[0], NumericField::Area.column(), scaling_name)?,
            fit_scaling(&numeric[1], NumericField::YearBuilt.column(), scaling_name)?,
            fit_vocabulary(&categorical[0], CategoricalField::Location.column(), vocabulary_name)?,
            fit_vocabulary(&categorical[1], CategoricalField::Garage.column(), vocabulary_name)?,
            fit_vocabulary(&categorical[2], CategoricalField::Condition.column(), vocabulary_name)?,
        );

        stats.log_summary();
        Ok(stats)
    }

    /// Scaling parameters for a numeric field
    pub fn scaling(&self, field: NumericField) -> &ScalingParams {
        match field {
            NumericField::Area => &self.area,
            NumericField::YearBuilt => &self.year_built,
        }
    }

    /// Vocabulary for a categorical field
    pub fn vocabulary(&self, field: CategoricalField) -> &Vocabulary {
        match field {
            CategoricalField::Location => &self.location,
            CategoricalField::Garage => &self.garage,
            CategoricalField::Condition => &self.condition,
        }
    }

    /// Check that every vocabulary produces exactly the indicator columns
    /// declared in [`FEATURE_SCHEMA`], in the same order.
    pub fn check_schema(&self) -> Result<(), FeatureError> {
        for field in CategoricalField::ALL {
            let expected: Vec<String> = field
                .indicator_labels()
                .into_iter()
                .map(str::to_string)
                .collect();
            let actual = self.vocabulary(field).indicators().to_vec();
            if expected != actual {
                return Err(FeatureError::SchemaMismatch {
                    field: field.column(),
                    expected,
                    actual,
                });
            }
        }

        debug_assert!(FEATURE_SCHEMA.iter().all(|slot| match slot {
            FeatureSlot::Scaled(_) => true,
            FeatureSlot::Indicator(field, label) => self.vocabulary(*field).contains(label),
        }));
        Ok(())
    }

    fn log_summary(&self) {
        for field in NumericField::ALL {
            let p = self.scaling(field);
            info!("Scaling {}: mean={:.4}, std={:.4}", field.column(), p.mean, p.std);
        }
        for field in CategoricalField::ALL {
            let v = self.vocabulary(field);
            info!(
                "Vocabulary {}: {} labels, reference={:?}",
                field.column(),
                v.len(),
                v.reference()
            );
            debug!("Vocabulary {} labels: {:?}", field.column(), v.labels());
        }
    }
}

struct Cell {
    line: u64,
    value: String,
}

fn open(path: &Path) -> Result<File, FeatureError> {
    File::open(path).map_err(|e| FeatureError::Dataset {
        source_name: path.display().to_string(),
        message: e.to_string(),
    })
}

fn fit_scaling(
    cells: &[Cell],
    column: &'static str,
    source_name: &str,
) -> Result<ScalingParams, FeatureError> {
    let mut values = Vec::with_capacity(cells.len());
    for cell in cells {
        match cell.value.parse::<f64>() {
            Ok(v) if v.is_finite() => values.push(v),
            _ => {
                return Err(FeatureError::InvalidCell {
                    source_name: source_name.to_string(),
                    line: cell.line,
                    column,
                    value: cell.value.clone(),
                })
            }
        }
    }
    ScalingParams::fit(column, &values)
}

fn fit_vocabulary(
    cells: &[Cell],
    column: &'static str,
    source_name: &str,
) -> Result<Vocabulary, FeatureError> {
    if let Some(blank) = cells.iter().find(|c| c.value.is_empty()) {
        return Err(FeatureError::InvalidCell {
            source_name: source_name.to_string(),
            line: blank.line,
            column,
            value: String::new(),
        });
    }
    Ok(Vocabulary::fit(cells.iter().map(|c| c.value.as_str())))
}

/// Read the named columns of a headed CSV, one vector of cells per column
fn read_columns<R: Read>(
    reader: R,
    source_name: &str,
    columns: &[&'static str],
) -> Result<Vec<Vec<Cell>>, FeatureError> {
    let dataset_error = |e: csv::Error| FeatureError::Dataset {
        source_name: source_name.to_string(),
        message: e.to_string(),
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers().map_err(dataset_error)?.clone();
    let mut indices = Vec::with_capacity(columns.len());
    for &column in columns {
        let idx = headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| FeatureError::MissingColumn {
                source_name: source_name.to_string(),
                column,
            })?;
        indices.push(idx);
    }

    let mut out: Vec<Vec<Cell>> = columns.iter().map(|_| Vec::new()).collect();
    for record in reader.records() {
        let record = record.map_err(dataset_error)?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        for (cells, &idx) in out.iter_mut().zip(&indices) {
            cells.push(Cell {
                line,
                value: record.get(idx).unwrap_or_default().to_string(),
            });
        }
    }

    if out.first().map_or(true, Vec::is_empty) {
        return Err(FeatureError::EmptyDataset(source_name.to_string()));
    }

    debug!("Read {} rows from {}", out[0].len(), source_name);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUSES: &str = "\
Area,YearBuilt,Location,Garage,Condition,Price
100,2000,Paris,Oui,Good,450000
80,1990,Lyon,Non,Fair,250000
120,2010,Marseille,Oui,Excellent,300000
60,1970,Bordeaux,Non,Poor,150000
";

    fn fit(csv: &str) -> Result<ReferenceStatistics, FeatureError> {
        ReferenceStatistics::from_readers(csv.as_bytes(), "scaling", csv.as_bytes(), "vocabulary")
    }

    #[test]
    fn test_population_std() {
        let p = ScalingParams::fit("x", &[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((p.mean - 5.0).abs() < 1e-12);
        assert!((p.std - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_scale_mean_is_zero() {
        let p = ScalingParams::fit("x", &[1.0, 2.0, 3.0]).unwrap();
        assert!(p.scale(p.mean).abs() < 1e-12);
    }

    #[test]
    fn test_zero_std_is_degenerate() {
        assert_eq!(
            ScalingParams::fit("Area", &[5.0, 5.0, 5.0]),
            Err(FeatureError::DegenerateScale { column: "Area", std: 0.0 })
        );
    }

    #[test]
    fn test_vocabulary_sorted_with_reference_first() {
        let v = Vocabulary::fit(["Paris", "Lyon", "Paris", "Bordeaux", "Marseille"]);
        assert_eq!(v.labels(), ["Bordeaux", "Lyon", "Marseille", "Paris"]);
        assert_eq!(v.reference(), Some("Bordeaux"));
        assert_eq!(v.indicators(), ["Lyon", "Marseille", "Paris"]);
        assert!(v.contains("Lyon"));
        assert!(!v.contains("Nice"));
    }

    #[test]
    fn test_fit_from_csv() {
        let stats = fit(HOUSES).unwrap();
        let area = stats.scaling(NumericField::Area);
        assert!((area.mean - 90.0).abs() < 1e-12);
        assert!((area.std - 500.0f64.sqrt()).abs() < 1e-12);
        assert_eq!(stats.vocabulary(CategoricalField::Garage).labels(), ["Non", "Oui"]);
        assert_eq!(
            stats.vocabulary(CategoricalField::Condition).reference(),
            Some("Excellent")
        );
        assert!(stats.check_schema().is_ok());
    }

    #[test]
    fn test_missing_column() {
        let err = fit("Area,Location\n1,Paris\n").unwrap_err();
        assert!(matches!(err, FeatureError::MissingColumn { column: "YearBuilt", .. }));
    }

    #[test]
    fn test_empty_dataset() {
        let err = fit("Area,YearBuilt,Location,Garage,Condition\n").unwrap_err();
        assert!(matches!(err, FeatureError::EmptyDataset(_)));
    }

    #[test]
    fn test_non_numeric_cell() {
        let csv = "Area,YearBuilt,Location,Garage,Condition\n100,old,Paris,Oui,Good\n90,2000,Lyon,Non,Fair\n";
        let err = fit(csv).unwrap_err();
        assert!(matches!(
            err,
            FeatureError::InvalidCell { column: "YearBuilt", line: 2, .. }
        ));
    }

    #[test]
    fn test_schema_mismatch_on_unexpected_label() {
        let csv = format!("{}95,1995,Nice,Oui,Good,200000\n", HOUSES);
        let stats = fit(&csv).unwrap();
        let err = stats.check_schema().unwrap_err();
        assert!(matches!(err, FeatureError::SchemaMismatch { field: "Location", .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = ReferenceStatistics::load(
            Path::new("/nonexistent/houses.csv"),
            Path::new("/nonexistent/houses.csv"),
        )
        .unwrap_err();
        assert!(matches!(err, FeatureError::Dataset { .. }));
    }
}
