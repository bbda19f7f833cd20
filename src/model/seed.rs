use crate::constants::ACCOUNT_ADDRESS_LENGTH;
use crate::constants::BASE58_ALPHABET;
use crate::constants::TRANSACTION_SIGNATURE_LENGTH;
use crate::error::ExplorerError;
use crate::model::key::NodeKey;

/// What the user typed into the search box, once classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedInput {
  Transaction(String),
  Account(NodeKey),
}

fn is_base58(input: &str) -> bool {
  input.bytes().all(|b| BASE58_ALPHABET.as_bytes().contains(&b))
}

impl SeedInput {
  /// Classifies by shape only. Nothing is decoded and nothing is fetched.
  ///
  /// Surrounding whitespace is trimmed first, so a pasted `" <signature>\n"`
  /// is accepted; the returned id never carries it.
  pub fn classify(input: &str) -> Result<Self, ExplorerError> {
    let input = input.trim();
    let invalid = || ExplorerError::InvalidInputFormat(input.to_string());

    if input.is_empty() || !is_base58(input) {
      return Err(invalid());
    }

    let len = input.len();
    if TRANSACTION_SIGNATURE_LENGTH.contains(&len) {
      return Ok(SeedInput::Transaction(input.to_string()));
    }
    if ACCOUNT_ADDRESS_LENGTH.contains(&len) {
      let key = NodeKey::new(input).map_err(|_| invalid())?;
      return Ok(SeedInput::Account(key));
    }
    Err(invalid())
  }
}

#[cfg(test)]
mod tests {
  use rstest::rstest;

  use super::*;

  const SIGNATURE: &str =
    "5VERv8NMvzbJMEkV8xnrLkEaWRtSz9CosKDYjCJjBRnbJLgp8uirBgmQpjKhoR4tjF3ZpRzrFmBV6UjKdiSZkQUW";
  const ADDRESS: &str = "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM";

  #[test]
  fn classifies_transaction_signature() {
    assert_eq!(SIGNATURE.len(), 88);
    assert_eq!(
      SeedInput::classify(SIGNATURE).unwrap(),
      SeedInput::Transaction(SIGNATURE.to_string())
    );
    assert!(matches!(SeedInput::classify(&SIGNATURE[..87]), Ok(SeedInput::Transaction(_))));
  }

  #[test]
  fn classifies_account_address_and_trims() {
    let padded = format!("  {}\n", ADDRESS);
    assert_eq!(
      SeedInput::classify(&padded).unwrap(),
      SeedInput::Account(NodeKey::new(ADDRESS).unwrap())
    );
    assert!(matches!(SeedInput::classify(&ADDRESS[..32]), Ok(SeedInput::Account(_))));
  }

  #[rstest]
  #[case("")]
  #[case("T1")]
  #[case("9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsG")] // 31 chars
  #[case("0WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM")] // '0' is not base58
  #[case("lIO0XwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM")]
  #[case("9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWMa")] // 45 chars
  #[case("5VERv8NMvzbJMEkV8xnrLkEaWRtSz9CosKDYjCJjBRnbJLgp8uirBgmQpjKhoR4tjF3ZpRzrFmBV6UjKdiSZkQ")] // 86 chars
  #[case("9WzDXwBbmkg8 ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM")]
  fn rejects_malformed_input(#[case] input: &str) {
    assert!(matches!(
      SeedInput::classify(input),
      Err(ExplorerError::InvalidInputFormat(_))
    ));
  }
}
