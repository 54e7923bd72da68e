use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// 延滞料金の通常レート（最初の7日間、1日あたり）
pub const STANDARD_DAILY_RATE: Decimal = dec!(0.50);

/// 延滞料金の割増レート（8日目以降、1日あたり）
pub const EXTENDED_DAILY_RATE: Decimal = dec!(1.00);

/// 通常レートが適用される延滞日数
pub const STANDARD_TIER_DAYS: i64 = 7;

/// 延滞料金の上限
pub const MAX_LATE_FEE: Decimal = dec!(15.00);

/// 料金計算の結果ステータス
///
/// 呼び出し側の脆弱な部分文字列照合を避けるため、
/// 自由記述の文字列ではなく閉じたバリアントで表現する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeStatus {
    /// 利用者IDが不正
    InvalidPatron,
    /// 貸出中のレコードが存在しない（返却済みを含む）
    NoActiveRecord,
    /// 延滞していない
    NotOverdue,
    /// 料金を計算した
    Calculated,
}

impl FeeStatus {
    /// 文字列表現を取得する
    pub fn as_str(&self) -> &'static str {
        match self {
            FeeStatus::InvalidPatron => "invalid_patron",
            FeeStatus::NoActiveRecord => "no_active_record",
            FeeStatus::NotOverdue => "not_overdue",
            FeeStatus::Calculated => "calculated",
        }
    }
}

/// 料金計算の結果
///
/// 要求の都度計算される一時的な値。永続化されない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeResult {
    /// 料金額（小数点以下2桁、0.00〜15.00）
    pub fee_amount: Decimal,
    /// 延滞日数（非負）
    pub days_overdue: i64,
    pub status: FeeStatus,
}

impl FeeResult {
    pub fn invalid_patron() -> Self {
        Self::zero(FeeStatus::InvalidPatron)
    }

    pub fn no_active_record() -> Self {
        Self::zero(FeeStatus::NoActiveRecord)
    }

    pub fn not_overdue() -> Self {
        Self::zero(FeeStatus::NotOverdue)
    }

    /// 延滞日数から料金を計算した結果を生成する
    pub fn calculated(days_overdue: i64) -> Self {
        Self {
            fee_amount: late_fee_for_days(days_overdue),
            days_overdue,
            status: FeeStatus::Calculated,
        }
    }

    fn zero(status: FeeStatus) -> Self {
        Self {
            fee_amount: Decimal::ZERO,
            days_overdue: 0,
            status,
        }
    }
}

/// 純粋関数：延滞日数を求める
///
/// 時刻は無視し、暦日単位で数える。負の値は期限前を意味する。
pub fn overdue_days(due_date: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now.date_naive() - due_date.date_naive()).num_days()
}

/// 純粋関数：延滞日数から料金を求める
///
/// 料金表：
/// - 最初の7日間は1日あたり0.50
/// - 8日目以降は1日あたり1.00
/// - 合計は15.00が上限
///
/// 結果は小数点以下2桁に丸める。
pub fn late_fee_for_days(days_overdue: i64) -> Decimal {
    if days_overdue <= 0 {
        return Decimal::ZERO;
    }
    let standard = Decimal::from(days_overdue.min(STANDARD_TIER_DAYS)) * STANDARD_DAILY_RATE;
    let extended = Decimal::from((days_overdue - STANDARD_TIER_DAYS).max(0)) * EXTENDED_DAILY_RATE;
    (standard + extended).min(MAX_LATE_FEE).round_dp(2)
}

/// 純粋関数：期限と現在時刻から料金計算結果を組み立てる
pub fn assess_fee(due_date: DateTime<Utc>, now: DateTime<Utc>) -> FeeResult {
    let days = overdue_days(due_date, now);
    if days <= 0 {
        FeeResult::not_overdue()
    } else {
        FeeResult::calculated(days)
    }
}
