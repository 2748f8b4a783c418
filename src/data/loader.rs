//! Dataset Loader Module
//! Loads the air-quality CSV with Polars, forward-fills missing
//! measurements and synthesizes the composed timestamp column.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::schema::{DATE_KEY, DATE_PART_FIELDS, MEASUREMENT_FIELDS};

#[derive(Error, Debug)]
pub enum DataError {
    #[error("Failed to read dataset: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Dataset is missing required column '{0}'")]
    MissingColumn(String),
}

/// The loaded observation table. Built once at startup, never mutated.
pub struct Dataset {
    df: DataFrame,
    file_path: Option<PathBuf>,
}

impl Dataset {
    /// Load the CSV at `path`. Missing cells (empty or literal `NA`)
    /// parse as nulls and are forward-filled per column.
    pub fn load(path: &Path) -> Result<Self, DataError> {
        let df = LazyCsvReader::new(path)
            .with_infer_schema_length(Some(10000))
            .with_null_values(Some(NullValues::AllColumns(vec!["NA".into(), "".into()])))
            .finish()?
            .collect()?;

        let mut dataset = Self::from_frame(df)?;
        dataset.file_path = Some(path.to_path_buf());
        Ok(dataset)
    }

    /// Validate the schema and derive the in-memory table: schema columns
    /// only (extras such as `No`, `wd`, `station` are dropped), Float64
    /// measurements forward-filled in file order, plus the composed
    /// timestamp column. Leading gaps stay null; downstream aggregation
    /// excludes them.
    pub fn from_frame(df: DataFrame) -> Result<Self, DataError> {
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        for required in DATE_PART_FIELDS.iter().chain(MEASUREMENT_FIELDS.iter()) {
            if !names.iter().any(|n| n == required) {
                return Err(DataError::MissingColumn((*required).to_string()));
            }
        }

        let mut keep: Vec<Expr> = DATE_PART_FIELDS
            .iter()
            .map(|name| col(*name).cast(DataType::Int64))
            .collect();
        keep.extend(
            MEASUREMENT_FIELDS
                .iter()
                .map(|name| col(*name).cast(DataType::Float64).forward_fill(None)),
        );

        let date_key = (col("year") * lit(1_000_000i64)
            + col("month") * lit(10_000i64)
            + col("day") * lit(100i64)
            + col("hour"))
        .alias(DATE_KEY);

        let df = df.lazy().select(keep).with_column(date_key).collect()?;

        Ok(Self {
            df,
            file_path: None,
        })
    }

    /// Get a reference to the loaded table.
    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    /// Get the number of observations.
    pub fn row_count(&self) -> usize {
        self.df.height()
    }

    /// Get the source file path, if loaded from disk.
    pub fn file_path(&self) -> Option<&PathBuf> {
        self.file_path.as_ref()
    }

    /// First and last calendar year covered, taken from the composed
    /// timestamp.
    pub fn year_span(&self) -> Option<(i64, i64)> {
        let keys = self.df.column(DATE_KEY).ok()?.i64().ok()?;
        match (keys.min(), keys.max()) {
            (Some(lo), Some(hi)) => Some((lo / 1_000_000, hi / 1_000_000)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    fn frame(
        years: &[i64],
        hours: &[i64],
        pm25: Vec<Option<f64>>,
        temp: Vec<Option<f64>>,
    ) -> DataFrame {
        let n = years.len();
        let mut df = df!(
            "year" => years,
            "month" => vec![1i64; n],
            "day" => vec![1i64; n],
            "hour" => hours,
            "PM2.5" => pm25,
            "TEMP" => temp,
        )
        .unwrap();
        for name in MEASUREMENT_FIELDS {
            if df.column(name).is_err() {
                df.with_column(Column::new(name.into(), vec![0.0f64; n]))
                    .unwrap();
            }
        }
        df
    }

    #[test]
    fn forward_fill_copies_nearest_prior_value() {
        let df = frame(
            &[2013, 2013, 2013, 2013],
            &[0, 1, 2, 3],
            vec![Some(10.0), None, None, Some(40.0)],
            vec![Some(1.0), Some(2.0), None, Some(4.0)],
        );
        let ds = Dataset::from_frame(df).unwrap();

        let pm = ds.frame().column("PM2.5").unwrap().f64().unwrap();
        assert_eq!(pm.get(0), Some(10.0));
        assert_eq!(pm.get(1), Some(10.0));
        assert_eq!(pm.get(2), Some(10.0));
        assert_eq!(pm.get(3), Some(40.0));

        let temp = ds.frame().column("TEMP").unwrap().f64().unwrap();
        assert_eq!(temp.get(2), Some(2.0));
    }

    #[test]
    fn leading_gap_stays_absent() {
        let df = frame(
            &[2013, 2013, 2013],
            &[0, 1, 2],
            vec![None, None, Some(5.0)],
            vec![Some(1.0), Some(1.0), Some(1.0)],
        );
        let ds = Dataset::from_frame(df).unwrap();

        let pm = ds.frame().column("PM2.5").unwrap().f64().unwrap();
        assert_eq!(pm.get(0), None);
        assert_eq!(pm.get(1), None);
        assert_eq!(pm.get(2), Some(5.0));
    }

    #[test]
    fn missing_required_column_is_fatal() {
        let df = df!(
            "year" => [2013i64],
            "month" => [1i64],
            "day" => [1i64],
            "hour" => [0i64],
            "PM2.5" => [1.0],
        )
        .unwrap();
        assert!(matches!(
            Dataset::from_frame(df),
            Err(DataError::MissingColumn(_))
        ));
    }

    #[test]
    fn date_key_composes_all_four_parts() {
        let df = frame(&[2013], &[5], vec![Some(1.0)], vec![Some(1.0)]);
        let ds = Dataset::from_frame(df).unwrap();

        let keys = ds.frame().column(DATE_KEY).unwrap().i64().unwrap();
        assert_eq!(keys.get(0), Some(2_013_010_105));
    }

    #[test]
    fn load_fails_for_missing_path() {
        assert!(Dataset::load(Path::new("/nonexistent/air_quality.csv")).is_err());
    }

    #[test]
    fn load_parses_na_cells_and_reports_span() {
        let path = std::env::temp_dir().join("aq_dashboard_loader_test.csv");
        let mut csv = String::from(
            "No,year,month,day,hour,PM2.5,PM10,SO2,NO2,CO,O3,TEMP,PRES,DEWP,RAIN,wd,WSPM,station\n",
        );
        csv.push_str("1,2013,3,1,0,10,20,3,15,300,50,0.5,1020,-5,0,NW,2.1,Shunyi\n");
        csv.push_str("2,2014,3,1,1,NA,22,4,16,310,52,0.8,1019,-4,0,NW,2.3,Shunyi\n");
        std::fs::write(&path, csv).unwrap();

        let ds = Dataset::load(&path).unwrap();
        assert_eq!(ds.row_count(), 2);
        assert_eq!(ds.year_span(), Some((2013, 2014)));

        // The NA cell takes the value of the row before it.
        let pm = ds.frame().column("PM2.5").unwrap().f64().unwrap();
        assert_eq!(pm.get(1), Some(10.0));

        // Non-schema columns are dropped.
        assert!(ds.frame().column("station").is_err());

        std::fs::remove_file(&path).ok();
    }
}
