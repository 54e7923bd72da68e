use serde::{Deserialize, Serialize};

use super::{IsbnError, PatronIdError, TransactionIdError};

/// 利用者ID - 6桁の図書館カード番号
///
/// 不変条件：数字6文字ちょうど。
/// 型システムでこの制約を強制し、不正な値を作成できないようにする。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatronId(String);

impl PatronId {
    /// 生の文字列からパースする
    ///
    /// # エラー
    /// 6文字でない場合は`WrongLength`、数字以外を含む場合は`NotNumeric`を返す
    pub fn parse(raw: &str) -> Result<Self, PatronIdError> {
        if raw.len() != 6 {
            return Err(PatronIdError::WrongLength);
        }
        if !raw.chars().all(|c| c.is_ascii_digit()) {
            return Err(PatronIdError::NotNumeric);
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PatronId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// 書籍ID - カタログストアのサロゲートキー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(i64);

impl BookId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for BookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// ISBN - 数字13文字ちょうど、カタログ内で一意
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Isbn(String);

impl Isbn {
    /// 生の文字列からパースする
    ///
    /// # エラー
    /// 13文字でない場合は`WrongLength`、数字以外を含む場合は`NotNumeric`を返す
    pub fn parse(raw: &str) -> Result<Self, IsbnError> {
        if raw.len() != 13 {
            return Err(IsbnError::WrongLength);
        }
        if !raw.chars().all(|c| c.is_ascii_digit()) {
            return Err(IsbnError::NotNumeric);
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Isbn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// 決済トランザクションID
///
/// ゲートウェイが合成する `txn_<利用者ID>_<サフィックス>` 形式の識別子。
/// ゲートウェイはレジを持たないため、形式が正しいIDはすべて有効とみなされる。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    /// 利用者IDとサフィックスから新しいIDを合成する
    pub fn synthesize(patron_id: &PatronId, suffix: &str) -> Self {
        Self(format!("txn_{}_{}", patron_id.as_str(), suffix))
    }

    /// 生の文字列からパースする
    ///
    /// `txn_` プレフィックス、6桁の利用者ID、空でないサフィックスの
    /// 3つの区画がすべて揃っていることを確認する。
    pub fn parse(raw: &str) -> Result<Self, TransactionIdError> {
        let rest = raw.strip_prefix("txn_").ok_or(TransactionIdError::MalformedId)?;
        let (patron_part, suffix) = rest.split_once('_').ok_or(TransactionIdError::MalformedId)?;
        if PatronId::parse(patron_part).is_err() || suffix.is_empty() {
            return Err(TransactionIdError::MalformedId);
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
