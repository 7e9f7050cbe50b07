//! 普通最小平方法線性迴歸
//!
//! 先將特徵與目標去中心化，再以部分主元高斯消去法解正規方程。
//! 共線欄位對應的主元低於容許值時視為自由變數並固定為 0。

use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

use super::error::{PipelineError, PipelineResult};

/// 主元容許值（相對於格拉姆矩陣對角線最大值）
const PIVOT_TOLERANCE: f64 = 1e-10;

/// 已擬合的線性模型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub coefficients: Array1<f64>,
    pub intercept: f64,
}

impl LinearModel {
    pub fn new(coefficients: Array1<f64>, intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
        }
    }

    /// 擬合 `target ≈ features · coefficients + intercept`
    pub fn fit(features: &Array2<f64>, target: &Array1<f64>) -> PipelineResult<Self> {
        let (rows, cols) = features.dim();
        if rows == 0 {
            return Err(PipelineError::DataFormat("沒有可用的訓練資料".to_string()));
        }
        if target.len() != rows {
            return Err(PipelineError::DataFormat(format!(
                "特徵列數 {} 與目標列數 {} 不一致",
                rows,
                target.len()
            )));
        }

        let y_mean = target.sum() / rows as f64;
        let x_mean = features
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(cols));

        let centered_x = features - &x_mean;
        let centered_y = target - y_mean;

        let gram = centered_x.t().dot(&centered_x);
        let moment = centered_x.t().dot(&centered_y);
        let coefficients = solve_normal_equations(gram, moment);
        let intercept = y_mean - x_mean.dot(&coefficients);

        Ok(Self::new(coefficients, intercept))
    }

    /// 單筆預測
    pub fn predict_one(&self, features: ArrayView1<f64>) -> f64 {
        self.intercept + self.coefficients.dot(&features)
    }

    /// 批次預測
    pub fn predict(&self, features: &Array2<f64>) -> Array1<f64> {
        features.dot(&self.coefficients) + self.intercept
    }

    /// 決定係數 R²
    ///
    /// 目標為常數時，完全擬合回傳 1，否則回傳 0。
    pub fn r_squared(&self, features: &Array2<f64>, target: &Array1<f64>) -> f64 {
        if target.is_empty() {
            return 0.0;
        }

        let mean = target.sum() / target.len() as f64;
        let residuals = target - &self.predict(features);
        let ss_res = residuals.mapv(|r| r * r).sum();
        let ss_tot = target.mapv(|y| (y - mean) * (y - mean)).sum();

        if ss_tot <= f64::EPSILON {
            return if ss_res <= f64::EPSILON { 1.0 } else { 0.0 };
        }
        1.0 - ss_res / ss_tot
    }
}

/// 以高斯-喬登消去法解 `gram · x = moment`
fn solve_normal_equations(mut gram: Array2<f64>, mut moment: Array1<f64>) -> Array1<f64> {
    let n = moment.len();
    let mut solution = Array1::zeros(n);
    if n == 0 {
        return solution;
    }

    let scale = gram
        .diag()
        .iter()
        .fold(1.0_f64, |acc, value| acc.max(value.abs()));
    let tolerance = PIVOT_TOLERANCE * scale;

    // pivot_rows[col] = 該欄主元所在列
    let mut pivot_rows: Vec<Option<usize>> = vec![None; n];
    let mut row = 0;

    for col in 0..n {
        if row >= n {
            break;
        }

        let (best_row, best_value) = (row..n)
            .map(|r| (r, gram[[r, col]].abs()))
            .fold((row, -1.0), |best, candidate| {
                if candidate.1 > best.1 {
                    candidate
                } else {
                    best
                }
            });
        if best_value <= tolerance {
            continue;
        }

        if best_row != row {
            for k in 0..n {
                gram.swap([row, k], [best_row, k]);
            }
            moment.swap(row, best_row);
        }

        let pivot = gram[[row, col]];
        for k in 0..n {
            gram[[row, k]] /= pivot;
        }
        moment[row] /= pivot;

        for other in 0..n {
            if other == row {
                continue;
            }
            let factor = gram[[other, col]];
            if factor == 0.0 {
                continue;
            }
            for k in 0..n {
                gram[[other, k]] -= factor * gram[[row, k]];
            }
            moment[other] -= factor * moment[row];
        }

        pivot_rows[col] = Some(row);
        row += 1;
    }

    for (col, pivot_row) in pivot_rows.iter().enumerate() {
        if let Some(r) = pivot_row {
            solution[col] = moment[*r];
        }
    }
    solution
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_fit_single_feature() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = array![5.0, 7.0, 9.0, 11.0];

        let model = LinearModel::fit(&x, &y).unwrap();
        assert_close(model.coefficients[0], 2.0);
        assert_close(model.intercept, 3.0);
        assert_close(model.r_squared(&x, &y), 1.0);
    }

    #[test]
    fn test_fit_two_features() {
        // y = 1.5 * a - 0.5 * b + 10
        let x = array![[1.0, 4.0], [2.0, 1.0], [3.0, 7.0], [5.0, 2.0], [8.0, 3.0]];
        let y = x.map_axis(Axis(1), |row| 1.5 * row[0] - 0.5 * row[1] + 10.0);

        let model = LinearModel::fit(&x, &y).unwrap();
        assert_close(model.coefficients[0], 1.5);
        assert_close(model.coefficients[1], -0.5);
        assert_close(model.intercept, 10.0);
    }

    #[test]
    fn test_collinear_features_still_fit() {
        // 第二欄是第一欄的兩倍
        let x = array![[1.0, 2.0], [2.0, 4.0], [3.0, 6.0]];
        let y = array![3.0, 5.0, 7.0];

        let model = LinearModel::fit(&x, &y).unwrap();
        let predictions = model.predict(&x);
        for (predicted, expected) in predictions.iter().zip(y.iter()) {
            assert_close(*predicted, *expected);
        }
        assert_eq!(model.coefficients[1], 0.0);
    }

    #[test]
    fn test_no_features_predicts_mean() {
        let x = Array2::<f64>::zeros((3, 0));
        let y = array![1.0, 2.0, 6.0];

        let model = LinearModel::fit(&x, &y).unwrap();
        assert!(model.coefficients.is_empty());
        assert_close(model.intercept, 3.0);
    }

    #[test]
    fn test_empty_dataset_rejected() {
        let x = Array2::<f64>::zeros((0, 2));
        let y = Array1::<f64>::zeros(0);
        assert!(matches!(
            LinearModel::fit(&x, &y),
            Err(PipelineError::DataFormat(_))
        ));
    }

    #[test]
    fn test_constant_target_r_squared() {
        let x = array![[1.0], [2.0]];
        let y = array![4.0, 4.0];
        let model = LinearModel::fit(&x, &y).unwrap();
        assert_close(model.r_squared(&x, &y), 1.0);
    }
}
