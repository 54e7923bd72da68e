use crate::domain::value_objects::TransactionId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 決済の判定結果
///
/// 承認・拒否はどちらも通常の戻り値。ポートの`Err`チャネルは
/// 予期しない障害（ネットワーク断など）のために確保されている。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentDecision {
    /// 承認。合成されたトランザクションIDと確認メッセージを伴う
    Approved {
        transaction_id: TransactionId,
        message: String,
    },
    /// 拒否。理由はメッセージに含まれる
    Declined { message: String },
}

/// 返金の判定結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefundDecision {
    Approved { message: String },
    Declined { message: String },
}

/// 決済ステータスの照会結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentStatus {
    /// 完了。照会時刻を伴う
    Completed { checked_at: DateTime<Utc> },
    /// トランザクションが見つからない
    NotFound { message: String },
}

/// 決済ゲートウェイポート
///
/// リモート決済サービスをケイパビリティとして抽象化する。
/// 実装は{real, mock}の差し替えが可能で、料金決済のロジックを
/// 変更せずに依存を置換できる。
///
/// リモート境界であるため、引数は検証済みの型ではなく生の値を取り、
/// ゲートウェイ自身がバリデーションを行う。
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// 延滞料金の決済を処理する
    ///
    /// バリデーション：利用者IDは数字6文字、金額は0より大きく1000以下。
    /// 違反は`Declined`として返る。
    async fn process_payment(
        &self,
        patron_id: &str,
        amount: Decimal,
        description: &str,
    ) -> Result<PaymentDecision>;

    /// 決済の返金を処理する
    ///
    /// バリデーション：トランザクションIDの形式と正の金額。
    /// 元の決済額との照合は行わない（呼び出し側の責務）。
    async fn refund_payment(&self, transaction_id: &str, amount: Decimal)
    -> Result<RefundDecision>;

    /// 決済ステータスを照会する
    ///
    /// 形式が正しいIDは常に`Completed`を返す（実レジの照会は行わない）。
    async fn verify_payment_status(&self, transaction_id: &str) -> Result<PaymentStatus>;
}
