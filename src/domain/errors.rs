/// 利用者IDのエラー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatronIdError {
    /// 6文字ちょうどでない
    WrongLength,
    /// 数字以外の文字を含む
    NotNumeric,
}

/// ISBNのエラー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsbnError {
    /// 13文字ちょうどでない
    WrongLength,
    /// 数字以外の文字を含む
    NotNumeric,
}

/// 決済トランザクションIDのエラー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionIdError {
    /// `txn_<利用者ID>_<サフィックス>` の形式に一致しない
    MalformedId,
}
