use crate::utils::error::{EvalError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Average {
    /// 所有類別合併計算 TP/FP/FN
    Micro,
    /// 每個類別分別計算後取平均
    Macro,
}

/// 多類別混淆矩陣，`counts[true][pred]`，類別為觀察到的標籤（排序後）
#[derive(Debug, Clone, PartialEq)]
pub struct ConfusionMatrix {
    labels: Vec<usize>,
    counts: Vec<Vec<usize>>,
}

impl ConfusionMatrix {
    pub fn from_labels(y_true: &[usize], y_pred: &[usize]) -> Result<Self> {
        if y_true.len() != y_pred.len() {
            return Err(EvalError::processing(format!(
                "label series differ in length: {} true vs {} predicted",
                y_true.len(),
                y_pred.len()
            )));
        }

        let mut labels: Vec<usize> = y_true.iter().chain(y_pred.iter()).copied().collect();
        labels.sort_unstable();
        labels.dedup();

        let mut counts = vec![vec![0usize; labels.len()]; labels.len()];
        for (t, p) in y_true.iter().zip(y_pred) {
            // labels 已排序且包含所有出現過的值
            let (Ok(ti), Ok(pi)) = (labels.binary_search(t), labels.binary_search(p)) else {
                continue;
            };
            counts[ti][pi] += 1;
        }

        Ok(Self { labels, counts })
    }

    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    pub fn n_classes(&self) -> usize {
        self.labels.len()
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    pub fn true_positives(&self, class: usize) -> usize {
        self.counts[class][class]
    }

    pub fn false_positives(&self, class: usize) -> usize {
        self.predicted_count(class) - self.true_positives(class)
    }

    pub fn false_negatives(&self, class: usize) -> usize {
        self.support(class) - self.true_positives(class)
    }

    /// 真實標籤為該類別的樣本數
    pub fn support(&self, class: usize) -> usize {
        self.counts[class].iter().sum()
    }

    pub fn predicted_count(&self, class: usize) -> usize {
        self.counts.iter().map(|row| row[class]).sum()
    }

    pub fn precision(&self, average: Average) -> f64 {
        match average {
            Average::Micro => {
                let tp: usize = (0..self.n_classes()).map(|c| self.true_positives(c)).sum();
                let fp: usize = (0..self.n_classes()).map(|c| self.false_positives(c)).sum();
                safe_ratio(tp as f64, (tp + fp) as f64)
            }
            Average::Macro => self.macro_average(|c| {
                let tp = self.true_positives(c);
                safe_ratio(tp as f64, (tp + self.false_positives(c)) as f64)
            }),
        }
    }

    pub fn recall(&self, average: Average) -> f64 {
        match average {
            Average::Micro => {
                let tp: usize = (0..self.n_classes()).map(|c| self.true_positives(c)).sum();
                let fn_: usize = (0..self.n_classes()).map(|c| self.false_negatives(c)).sum();
                safe_ratio(tp as f64, (tp + fn_) as f64)
            }
            Average::Macro => self.macro_average(|c| {
                let tp = self.true_positives(c);
                safe_ratio(tp as f64, (tp + self.false_negatives(c)) as f64)
            }),
        }
    }

    /// F1 = 2TP / (2TP + FP + FN)，分母為 0 時記為 0
    pub fn f1(&self, average: Average) -> f64 {
        let f1_of = |tp: usize, fp: usize, fn_: usize| {
            safe_ratio(2.0 * tp as f64, (2 * tp + fp + fn_) as f64)
        };

        match average {
            Average::Micro => {
                let (tp, fp, fn_) = (0..self.n_classes()).fold((0, 0, 0), |(tp, fp, fn_), c| {
                    (
                        tp + self.true_positives(c),
                        fp + self.false_positives(c),
                        fn_ + self.false_negatives(c),
                    )
                });
                f1_of(tp, fp, fn_)
            }
            Average::Macro => self.macro_average(|c| {
                f1_of(
                    self.true_positives(c),
                    self.false_positives(c),
                    self.false_negatives(c),
                )
            }),
        }
    }

    /// 多類別 Matthews 相關係數（Gorodkin R_K），任一變異數為 0 時回傳 0
    pub fn matthews_corrcoef(&self) -> f64 {
        let n = self.total() as f64;
        let correct: f64 = (0..self.n_classes())
            .map(|c| self.true_positives(c) as f64)
            .sum();
        let true_sums: Vec<f64> = (0..self.n_classes()).map(|c| self.support(c) as f64).collect();
        let pred_sums: Vec<f64> = (0..self.n_classes())
            .map(|c| self.predicted_count(c) as f64)
            .collect();

        let dot = |a: &[f64], b: &[f64]| a.iter().zip(b).map(|(x, y)| x * y).sum::<f64>();

        let cov_true_pred = correct * n - dot(&true_sums, &pred_sums);
        let cov_pred_pred = n * n - dot(&pred_sums, &pred_sums);
        let cov_true_true = n * n - dot(&true_sums, &true_sums);

        if cov_pred_pred * cov_true_true == 0.0 {
            return 0.0;
        }
        cov_true_pred / (cov_true_true * cov_pred_pred).sqrt()
    }

    fn macro_average(&self, per_class: impl Fn(usize) -> f64) -> f64 {
        if self.n_classes() == 0 {
            return 0.0;
        }
        (0..self.n_classes()).map(per_class).sum::<f64>() / self.n_classes() as f64
    }
}

fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationMetrics {
    pub recall_micro: f64,
    pub recall_macro: f64,
    pub precision_micro: f64,
    pub precision_macro: f64,
    pub f1_micro: f64,
    pub f1_macro: f64,
    pub matthews_correlation_coefficient: f64,
}

/// 沒有樣本時回傳 `None`（報表中輸出為空物件）
pub fn classification_metrics(
    y_true: &[usize],
    y_pred: &[usize],
) -> Result<Option<ClassificationMetrics>> {
    let matrix = ConfusionMatrix::from_labels(y_true, y_pred)?;
    if matrix.total() == 0 {
        return Ok(None);
    }

    Ok(Some(ClassificationMetrics {
        recall_micro: matrix.recall(Average::Micro),
        recall_macro: matrix.recall(Average::Macro),
        precision_micro: matrix.precision(Average::Micro),
        precision_macro: matrix.precision(Average::Macro),
        f1_micro: matrix.f1(Average::Micro),
        f1_macro: matrix.f1(Average::Macro),
        matthews_correlation_coefficient: matrix.matthews_corrcoef(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_confusion_matrix_counts() {
        let matrix = ConfusionMatrix::from_labels(&[0, 1, 2, 0, 1, 2], &[0, 2, 1, 0, 0, 1]).unwrap();
        assert_eq!(matrix.labels(), &[0, 1, 2]);
        assert_eq!(matrix.total(), 6);
        assert_eq!(matrix.true_positives(0), 2);
        assert_eq!(matrix.false_positives(0), 1);
        assert_eq!(matrix.false_negatives(1), 2);
        assert_eq!(matrix.predicted_count(1), 2);
    }

    #[test]
    fn test_multiclass_matches_reference_values() {
        // sklearn: precision_score(..., average="macro") == 0.2222...
        let metrics = classification_metrics(&[0, 1, 2, 0, 1, 2], &[0, 2, 1, 0, 0, 1])
            .unwrap()
            .unwrap();

        assert_relative_eq!(metrics.precision_macro, 2.0 / 9.0, epsilon = 1e-12);
        assert_relative_eq!(metrics.precision_micro, 1.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(metrics.recall_macro, 1.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(metrics.recall_micro, 1.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(metrics.f1_macro, 0.8 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(metrics.f1_micro, 1.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(metrics.matthews_correlation_coefficient, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_binary_matthews() {
        // sklearn 文件範例：matthews_corrcoef([1, 1, 1, 0], [1, 0, 1, 1]) == -0.333...
        let metrics = classification_metrics(&[1, 1, 1, 0], &[1, 0, 1, 1]).unwrap().unwrap();
        assert_relative_eq!(metrics.matthews_correlation_coefficient, -1.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_perfect_prediction() {
        let labels = [3, 1, 4, 1, 5];
        let metrics = classification_metrics(&labels, &labels).unwrap().unwrap();
        assert_eq!(metrics.recall_macro, 1.0);
        assert_eq!(metrics.precision_macro, 1.0);
        assert_eq!(metrics.f1_micro, 1.0);
        assert_eq!(metrics.matthews_correlation_coefficient, 1.0);
    }

    #[test]
    fn test_single_class_has_zero_mcc() {
        let metrics = classification_metrics(&[0, 0, 0], &[0, 0, 0]).unwrap().unwrap();
        assert_eq!(metrics.recall_micro, 1.0);
        assert_eq!(metrics.matthews_correlation_coefficient, 0.0);
    }

    #[test]
    fn test_label_only_predicted_counts_with_zero_division() {
        // 類別 2 從未出現在真實標籤中：recall 分母為 0，記為 0
        let metrics = classification_metrics(&[1, 1], &[1, 2]).unwrap().unwrap();
        assert_relative_eq!(metrics.recall_macro, 0.25, epsilon = 1e-12);
        assert_relative_eq!(metrics.precision_macro, 0.5, epsilon = 1e-12);
        assert_relative_eq!(metrics.recall_micro, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_and_mismatched_inputs() {
        assert_eq!(classification_metrics(&[], &[]).unwrap(), None);
        assert!(classification_metrics(&[1, 2], &[1]).is_err());
    }
}
