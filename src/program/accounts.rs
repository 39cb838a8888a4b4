//! Account state queried from the x/auth module.
//!
//! The node answers `/cosmos.auth.v1beta1.Query/Account` with an `Any`
//! wrapping the concrete account type; only `BaseAccount` is supported.

use prost::Message;
use tonic::client::Grpc;
use tonic::codec::ProstCodec;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::Channel;
use tonic::Code;

use crate::program::constants::{ACCOUNT_QUERY_PATH, BASE_ACCOUNT_TYPE_URL};
use crate::program::error::{SdkError, SdkResult};
use crate::program::tx::Any;

// ============================================================================
// Wire types
// ============================================================================

/// `cosmos.auth.v1beta1.BaseAccount`
#[derive(Clone, PartialEq, Message)]
pub struct BaseAccount {
    #[prost(string, tag = "1")]
    pub address: String,
    #[prost(message, optional, tag = "2")]
    pub pub_key: Option<Any>,
    #[prost(uint64, tag = "3")]
    pub account_number: u64,
    #[prost(uint64, tag = "4")]
    pub sequence: u64,
}

#[derive(Clone, PartialEq, Message)]
pub struct QueryAccountRequest {
    #[prost(string, tag = "1")]
    pub address: String,
}

#[derive(Clone, PartialEq, Message)]
pub struct QueryAccountResponse {
    #[prost(message, optional, tag = "1")]
    pub account: Option<Any>,
}

impl BaseAccount {
    /// Decode from the `Any` returned by the account query.
    pub fn from_any(any: &Any) -> SdkResult<Self> {
        if any.type_url != BASE_ACCOUNT_TYPE_URL {
            return Err(SdkError::UnexpectedAccountType(any.type_url.clone()));
        }
        Ok(Self::decode(any.value.as_slice())?)
    }

    pub fn to_any(&self) -> Any {
        Any {
            type_url: BASE_ACCOUNT_TYPE_URL.to_string(),
            value: self.encode_to_vec(),
        }
    }
}

// ============================================================================
// Cached account state
// ============================================================================

/// Account number and sequence, as cached on a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccountInfo {
    pub account_number: u64,
    pub sequence: u64,
}

impl From<&BaseAccount> for AccountInfo {
    fn from(account: &BaseAccount) -> Self {
        Self {
            account_number: account.account_number,
            sequence: account.sequence,
        }
    }
}

// ============================================================================
// Query
// ============================================================================

/// Fetch the `BaseAccount` for `address`.
///
/// # Errors
///
/// Returns [`SdkError::AccountNotFound`] when the node reports `NotFound`
/// (the account has never received funds), [`SdkError::Grpc`] for other
/// statuses, and [`SdkError::UnexpectedAccountType`] for non-base accounts.
pub async fn query_account(channel: &Channel, address: &str) -> SdkResult<BaseAccount> {
    let mut grpc = Grpc::new(channel.clone());
    grpc.ready().await?;

    let request = tonic::Request::new(QueryAccountRequest {
        address: address.to_string(),
    });
    let codec: ProstCodec<QueryAccountRequest, QueryAccountResponse> = ProstCodec::default();
    let path = PathAndQuery::from_static(ACCOUNT_QUERY_PATH);

    tracing::debug!(address, path = ACCOUNT_QUERY_PATH, "Querying account");

    let response = grpc.unary(request, path, codec).await.map_err(|status| {
        if status.code() == Code::NotFound {
            SdkError::AccountNotFound(address.to_string())
        } else {
            SdkError::from(status)
        }
    })?;

    let any = response
        .into_inner()
        .account
        .ok_or_else(|| SdkError::AccountNotFound(address.to_string()))?;

    BaseAccount::from_any(&any)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> BaseAccount {
        BaseAccount {
            address: "dydx199tqg4wdlnu4qjlxchpd7seg454937hjrknju4".to_string(),
            pub_key: None,
            account_number: 12,
            sequence: 34,
        }
    }

    #[test]
    fn test_base_account_from_any() {
        let decoded = BaseAccount::from_any(&account().to_any()).unwrap();
        assert_eq!(decoded, account());

        let info = AccountInfo::from(&decoded);
        assert_eq!(info.account_number, 12);
        assert_eq!(info.sequence, 34);
    }

    #[test]
    fn test_rejects_other_account_types() {
        let any = Any {
            type_url: "/cosmos.vesting.v1beta1.ContinuousVestingAccount".to_string(),
            value: Vec::new(),
        };
        assert!(matches!(
            BaseAccount::from_any(&any),
            Err(SdkError::UnexpectedAccountType(_))
        ));
    }

    #[test]
    fn test_garbage_bytes_fail_to_decode() {
        let any = Any {
            type_url: BASE_ACCOUNT_TYPE_URL.to_string(),
            value: vec![0xff, 0xff, 0xff],
        };
        assert!(matches!(BaseAccount::from_any(&any), Err(SdkError::Decode(_))));
    }

    #[test]
    fn test_response_without_account() {
        let resp = QueryAccountResponse::decode(&[][..]).unwrap();
        assert!(resp.account.is_none());
    }

    #[tokio::test]
    async fn test_query_unreachable_node_fails() {
        let channel = Channel::from_static("http://127.0.0.1:1").connect_lazy();
        let result = query_account(&channel, "dydx1xyz").await;
        assert!(result.is_err());
    }
}
