//! Aggregation Engine Module
//! Yearly mean trends and pairwise-complete Pearson correlations over the
//! loaded dataset. Every operation is a pure function of the table and
//! its parameters.

use polars::prelude::*;
use thiserror::Error;

use crate::data::{is_measurement_field, Dataset};

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Unknown field '{0}'")]
    UnknownField(String),
    #[error("No fields selected")]
    NoFields,
    #[error("Computation failed: {0}")]
    PolarsError(#[from] PolarsError),
}

/// One (year, mean) point of a yearly trend. `mean` is `None` when the
/// year has no non-absent values for the field.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    pub year: i32,
    pub mean: Option<f64>,
}

/// Yearly mean series for one measurement field, ascending by year, one
/// point per distinct year in the dataset.
#[derive(Debug, Clone)]
pub struct YearlyTrend {
    pub field: String,
    pub points: Vec<TrendPoint>,
}

/// Square, symmetric matrix of Pearson coefficients labelled by field
/// name. `None` marks an undefined statistic (fewer than two
/// pairwise-complete rows, or zero variance); it is never substituted
/// with a number.
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    pub fields: Vec<String>,
    values: Vec<Option<f64>>,
}

impl CorrelationMatrix {
    pub fn size(&self) -> usize {
        self.fields.len()
    }

    pub fn get(&self, row: usize, column: usize) -> Option<f64> {
        self.values[row * self.fields.len() + column]
    }
}

/// Computes the derived views the charts render.
pub struct Aggregator;

impl Aggregator {
    /// Mean of `field` per calendar year, ascending, nulls excluded from
    /// each mean. A year whose values are all absent keeps an explicit
    /// `None` mean.
    pub fn yearly_trend(dataset: &Dataset, field: &str) -> Result<YearlyTrend, StatsError> {
        if !is_measurement_field(field) {
            return Err(StatsError::UnknownField(field.to_string()));
        }

        let out = dataset
            .frame()
            .clone()
            .lazy()
            .group_by([col("year")])
            .agg([col(field).mean().alias("mean")])
            .sort(["year"], Default::default())
            .select([col("year").cast(DataType::Int32), col("mean")])
            .collect()?;

        let years = out.column("year")?.i32()?;
        let means = out.column("mean")?.f64()?;

        let points = years
            .into_iter()
            .zip(means)
            .filter_map(|(year, mean)| year.map(|year| TrendPoint { year, mean }))
            .collect();

        Ok(YearlyTrend {
            field: field.to_string(),
            points,
        })
    }

    /// Pearson correlation matrix over the given fields, using
    /// pairwise-complete rows only. Self-correlation is exactly 1.0
    /// whenever the statistic is defined at all.
    pub fn correlation(
        dataset: &Dataset,
        fields: &[String],
    ) -> Result<CorrelationMatrix, StatsError> {
        if fields.is_empty() {
            return Err(StatsError::NoFields);
        }
        for field in fields {
            if !is_measurement_field(field) {
                return Err(StatsError::UnknownField(field.clone()));
            }
        }

        let df = dataset.frame();
        let mut columns: Vec<&Float64Chunked> = Vec::with_capacity(fields.len());
        for field in fields {
            columns.push(df.column(field.as_str())?.f64()?);
        }

        let n = fields.len();
        let mut values = vec![None; n * n];
        for i in 0..n {
            for j in 0..=i {
                let coefficient = if i == j {
                    Self::pearson(columns[i], columns[j]).map(|_| 1.0)
                } else {
                    Self::pearson(columns[i], columns[j])
                };
                values[i * n + j] = coefficient;
                values[j * n + i] = coefficient;
            }
        }

        Ok(CorrelationMatrix {
            fields: fields.to_vec(),
            values,
        })
    }

    /// Pearson product-moment coefficient over rows where both sides are
    /// present. `None` when fewer than two such rows exist or either side
    /// has zero variance; clamped so float error never leaves [-1, 1].
    fn pearson(xs: &Float64Chunked, ys: &Float64Chunked) -> Option<f64> {
        let mut n = 0.0f64;
        let (mut sum_x, mut sum_y) = (0.0f64, 0.0f64);
        let (mut sum_xx, mut sum_yy, mut sum_xy) = (0.0f64, 0.0f64, 0.0f64);

        for (x, y) in xs.into_iter().zip(ys) {
            let (Some(x), Some(y)) = (x, y) else { continue };
            if x.is_nan() || y.is_nan() {
                continue;
            }
            n += 1.0;
            sum_x += x;
            sum_y += y;
            sum_xx += x * x;
            sum_yy += y * y;
            sum_xy += x * y;
        }

        if n < 2.0 {
            return None;
        }

        let var_x = sum_xx - sum_x * sum_x / n;
        let var_y = sum_yy - sum_y * sum_y / n;
        if var_x <= 0.0 || var_y <= 0.0 {
            return None;
        }

        let cov = sum_xy - sum_x * sum_y / n;
        Some((cov / (var_x * var_y).sqrt()).clamp(-1.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MEASUREMENT_FIELDS;
    use polars::df;

    fn dataset(years: &[i64], pm25: Vec<Option<f64>>, temp: Vec<Option<f64>>) -> Dataset {
        let n = years.len();
        let hours: Vec<i64> = (0..n as i64).collect();
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
        Dataset::from_frame(df).unwrap()
    }

    #[test]
    fn yearly_trend_averages_per_year() {
        let ds = dataset(
            &[2013, 2013, 2014],
            vec![Some(10.0), Some(20.0), Some(30.0)],
            vec![Some(0.0), Some(0.0), Some(0.0)],
        );
        let trend = Aggregator::yearly_trend(&ds, "PM2.5").unwrap();

        assert_eq!(trend.field, "PM2.5");
        assert_eq!(
            trend.points,
            vec![
                TrendPoint {
                    year: 2013,
                    mean: Some(15.0)
                },
                TrendPoint {
                    year: 2014,
                    mean: Some(30.0)
                },
            ]
        );
    }

    #[test]
    fn yearly_trend_is_ascending_and_duplicate_free() {
        let ds = dataset(
            &[2015, 2013, 2014, 2013, 2015],
            vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0)],
            vec![Some(0.0); 5],
        );
        let trend = Aggregator::yearly_trend(&ds, "PM2.5").unwrap();

        let years: Vec<i32> = trend.points.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![2013, 2014, 2015]);
    }

    #[test]
    fn yearly_trend_keeps_absent_year_as_none() {
        // 2013 has only a leading gap for PM2.5, so forward fill leaves
        // the whole year absent.
        let ds = dataset(
            &[2013, 2013, 2014],
            vec![None, None, Some(30.0)],
            vec![Some(0.0), Some(0.0), Some(0.0)],
        );
        let trend = Aggregator::yearly_trend(&ds, "PM2.5").unwrap();

        assert_eq!(trend.points[0].year, 2013);
        assert_eq!(trend.points[0].mean, None);
        assert_eq!(trend.points[1].mean, Some(30.0));
    }

    #[test]
    fn yearly_trend_rejects_unknown_field() {
        let ds = dataset(&[2013], vec![Some(1.0)], vec![Some(1.0)]);
        assert!(matches!(
            Aggregator::yearly_trend(&ds, "humidity"),
            Err(StatsError::UnknownField(_))
        ));
    }

    #[test]
    fn single_field_correlation_is_exactly_one() {
        let ds = dataset(
            &[2013, 2013, 2013],
            vec![Some(1.0), Some(2.0), Some(3.0)],
            vec![Some(0.0); 3],
        );
        let matrix = Aggregator::correlation(&ds, &["PM2.5".to_string()]).unwrap();

        assert_eq!(matrix.size(), 1);
        assert_eq!(matrix.get(0, 0), Some(1.0));
    }

    #[test]
    fn constant_field_correlation_is_undefined() {
        let ds = dataset(
            &[2013, 2013, 2013],
            vec![Some(7.0), Some(7.0), Some(7.0)],
            vec![Some(1.0), Some(2.0), Some(3.0)],
        );
        let matrix =
            Aggregator::correlation(&ds, &["PM2.5".to_string(), "TEMP".to_string()]).unwrap();

        assert_eq!(matrix.get(0, 0), None);
        assert_eq!(matrix.get(0, 1), None);
        assert_eq!(matrix.get(1, 0), None);
        assert_eq!(matrix.get(1, 1), Some(1.0));
    }

    #[test]
    fn correlation_is_symmetric_and_bounded() {
        let ds = dataset(
            &[2013, 2013, 2013, 2013],
            vec![Some(3.0), Some(1.0), Some(4.0), Some(1.5)],
            vec![Some(-2.0), Some(0.5), Some(9.0), Some(4.0)],
        );
        let matrix =
            Aggregator::correlation(&ds, &["PM2.5".to_string(), "TEMP".to_string()]).unwrap();

        let ab = matrix.get(0, 1).unwrap();
        let ba = matrix.get(1, 0).unwrap();
        assert_eq!(ab, ba);
        assert!((-1.0..=1.0).contains(&ab));
    }

    #[test]
    fn identical_fields_correlate_to_one() {
        let ds = dataset(
            &[2013, 2013, 2013],
            vec![Some(1.0), Some(2.0), Some(3.0)],
            vec![Some(1.0), Some(2.0), Some(3.0)],
        );
        let matrix =
            Aggregator::correlation(&ds, &["PM2.5".to_string(), "TEMP".to_string()]).unwrap();

        let r = matrix.get(0, 1).unwrap();
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn correlation_uses_pairwise_complete_rows_only() {
        // The first row has no PM2.5 value, so only the last three rows
        // enter the pair: x = [1, 2, 3], y = [1, 3, 2] gives r = 0.5.
        let ds = dataset(
            &[2013, 2013, 2013, 2013],
            vec![None, Some(1.0), Some(3.0), Some(2.0)],
            vec![Some(9.0), Some(1.0), Some(2.0), Some(3.0)],
        );
        let matrix =
            Aggregator::correlation(&ds, &["TEMP".to_string(), "PM2.5".to_string()]).unwrap();

        let r = matrix.get(0, 1).unwrap();
        assert!((r - 0.5).abs() < 1e-9);
    }

    #[test]
    fn correlation_with_one_complete_row_is_undefined() {
        let ds = dataset(
            &[2013, 2013],
            vec![None, Some(1.0)],
            vec![Some(2.0), Some(3.0)],
        );
        let matrix =
            Aggregator::correlation(&ds, &["PM2.5".to_string(), "TEMP".to_string()]).unwrap();

        assert_eq!(matrix.get(0, 1), None);
    }

    #[test]
    fn correlation_rejects_bad_selections() {
        let ds = dataset(&[2013], vec![Some(1.0)], vec![Some(1.0)]);
        assert!(matches!(
            Aggregator::correlation(&ds, &[]),
            Err(StatsError::NoFields)
        ));
        assert!(matches!(
            Aggregator::correlation(&ds, &["humidity".to_string()]),
            Err(StatsError::UnknownField(_))
        ));
    }
}
