//! Mock chat provider for local development and tests.
//!
//! Stands in for the remote completion endpoint: canned structured payloads
//! are selected by substring-matching the first system message, the same
//! keying the development fixture of the original service used. Unknown
//! request content is a hard error, never a silent fallback.

use crate::error::{MocksmithError, Result};

use super::cost::{PromptTokensDetails, UsageRecord};
use super::provider::{ChatCompletion, ChatProvider, ChatRequest};

/// Canned requirement-analysis payload.
const REQUIREMENTS_PAYLOAD: &str = r#"{"summary":"OWASP Top 10を考慮したセキュリティ要件定義","requirementDefinitions":[{"category":"セキュリティ","items":[{"type":"non-functional","ja":"通信はTLS 1.2以上を使用して暗号化する。","en":"Use TLS 1.2 or above for encrypted communications."},{"type":"non-functional","ja":"パスワードはbcrypt、scrypt、またはArgon2でハッシュ化する。","en":"Hash passwords using a strong algorithm such as bcrypt, scrypt, or Argon2."},{"type":"functional","ja":"ユーザーには二要素認証のオプションを提供する。","en":"Provide users with an option for two-factor authentication."}]},{"category":"運用","items":[{"type":"non-functional","ja":"定期的にセキュリティアップデートを適用し、既知の脆弱性からシステムを保護する。","en":"Regularly apply security updates to protect against known vulnerabilities."},{"type":"note","ja":"ログイン試行制限を設けてブルートフォース攻撃を防ぐ。","en":"Implement login attempt limits to prevent brute force attacks."}]}]}"#;

/// Canned table-data payload (a five-user mock table).
const TABLE_DATA_PAYLOAD: &str = r#"{"data":[{"name":{"first":"John","middle":null,"last":"Doe"},"address":{"country":"アメリカ合衆国","zipCode":"10001","address":"123 Main St, New York, NY"},"gender":"male","birthday":{"year":1990,"month":5,"day":15},"loginTime":{"hour":14,"minute":30,"second":45},"countOfLogin":150},{"name":{"first":"Anna","middle":"Maria","last":"Smith"},"address":{"country":"イギリス","zipCode":"SW1A 1AA","address":"10 Downing St, London"},"gender":"female","birthday":{"year":1985,"month":7,"day":22},"loginTime":null,"countOfLogin":null},{"name":{"first":"Yuki","middle":null,"last":"Tanaka"},"address":{"country":"日本","zipCode":"150-0001","address":"東京都渋谷区神宮前1-1-1"},"gender":"female","birthday":{"year":1992,"month":3,"day":10},"loginTime":{"hour":9,"minute":15,"second":30},"countOfLogin":85},{"name":{"first":"Carlos","middle":null,"last":"Gomez"},"address":{"country":"スペイン","zipCode":"28013","address":"Calle de Alcalá, Madrid"},"gender":"male","birthday":{"year":1988,"month":11,"day":5},"loginTime":{"hour":20,"minute":45,"second":10},"countOfLogin":200},{"name":{"first":"Liu","middle":null,"last":"Wei"},"address":{"country":"中国","zipCode":"100000","address":"北京市朝阳区建国路1号"},"gender":"male","birthday":{"year":1995,"month":12,"day":25},"loginTime":null,"countOfLogin":null}],"summary":"グローバルなWebサイトのユーザーテーブルのモックデータ。5名分。"}"#;

/// Canned translation payload.
const TRANSLATION_PAYLOAD: &str = r#"{"summary":"用語集を考慮して技術文書を翻訳した。","data":[{"en":"The streaming reducer rebuilds partial results as fragments arrive.","nuance":"fragmentは構造境界に揃わない断片というニュアンスを含みます。"},{"en":"Schema compilation happens before any remote call is made.","nuance":"happensは処理が自動的に走る軽いニュアンスです。"}]}"#;

/// Mock provider returning canned structured responses.
pub struct MockProvider {
    /// Character count per streamed fragment.
    fragment_size: usize,
}

impl MockProvider {
    pub fn new() -> Self {
        Self { fragment_size: 7 }
    }

    /// Override the streamed fragment size (characters).
    pub fn with_fragment_size(mut self, size: usize) -> Self {
        self.fragment_size = size.max(1);
        self
    }

    /// Select the canned payload by the first system message's content.
    fn canned_response(&self, request: &ChatRequest) -> Result<(&'static str, UsageRecord)> {
        let system_content = request
            .messages
            .first()
            .map(|m| m.content.as_str())
            .unwrap_or_default();

        if system_content.contains("要件定義") {
            Ok((REQUIREMENTS_PAYLOAD, usage(167, 575)))
        } else if system_content.contains("mock data") {
            Ok((TABLE_DATA_PAYLOAD, usage(211, 436)))
        } else if system_content.contains("translator") {
            Ok((TRANSLATION_PAYLOAD, usage(180, 120)))
        } else {
            Err(MocksmithError::Config(format!(
                "unknown request at mock provider: '{}'",
                system_content.chars().take(40).collect::<String>()
            )))
        }
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatProvider for MockProvider {
    fn complete(&self, request: &ChatRequest) -> Result<ChatCompletion> {
        let (content, usage) = self.canned_response(request)?;
        Ok(ChatCompletion {
            content: content.to_string(),
            usage: Some(usage),
        })
    }

    fn complete_streaming(
        &self,
        request: &ChatRequest,
        on_fragment: &mut dyn FnMut(&str) -> Result<()>,
    ) -> Result<ChatCompletion> {
        let (content, usage) = self.canned_response(request)?;
        let chars: Vec<char> = content.chars().collect();
        for chunk in chars.chunks(self.fragment_size) {
            let fragment: String = chunk.iter().collect();
            on_fragment(&fragment)?;
        }
        Ok(ChatCompletion {
            content: content.to_string(),
            usage: Some(usage),
        })
    }

    fn name(&self) -> &str {
        "mock"
    }
}

fn usage(prompt: u64, completion: u64) -> UsageRecord {
    UsageRecord {
        prompt_tokens: prompt,
        completion_tokens: completion,
        prompt_tokens_details: Some(PromptTokensDetails::default()),
        completion_tokens_details: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::provider::ChatMessage;
    use serde_json::{json, Value};

    fn request(system: &str) -> ChatRequest {
        ChatRequest {
            model: "gpt-4o-2024-08-06".to_string(),
            messages: vec![ChatMessage::system(system), ChatMessage::user("go")],
            response_format: json!({}),
            top_p: 0.5,
            temperature: None,
        }
    }

    #[test]
    fn test_keying_by_system_message() {
        let provider = MockProvider::new();
        let table = provider.complete(&request("Please generate mock data.")).unwrap();
        assert!(table.content.contains("\"data\""));

        let reqs = provider.complete(&request("以下システムに対して要件定義してください")).unwrap();
        assert!(reqs.content.contains("requirementDefinitions"));

        let tr = provider
            .complete(&request("You are a professional translator."))
            .unwrap();
        assert!(tr.content.contains("nuance"));
    }

    #[test]
    fn test_unknown_content_is_hard_error() {
        let provider = MockProvider::new();
        assert!(provider.complete(&request("something else")).is_err());
    }

    #[test]
    fn test_canned_payloads_are_valid_json() {
        for payload in [REQUIREMENTS_PAYLOAD, TABLE_DATA_PAYLOAD, TRANSLATION_PAYLOAD] {
            serde_json::from_str::<Value>(payload).unwrap();
        }
    }

    #[test]
    fn test_streaming_reassembles_to_full_payload() {
        let provider = MockProvider::new().with_fragment_size(5);
        let mut collected = String::new();
        let mut fragments = 0;
        let completion = provider
            .complete_streaming(&request("Please generate mock data."), &mut |f| {
                collected.push_str(f);
                fragments += 1;
                Ok(())
            })
            .unwrap();
        assert!(fragments > 1);
        assert_eq!(collected, completion.content);
        assert_eq!(completion.usage.unwrap().prompt_tokens, 211);
    }

    #[test]
    fn test_callback_error_aborts_stream() {
        let provider = MockProvider::new();
        let result = provider.complete_streaming(&request("Please generate mock data."), &mut |_| {
            Err(MocksmithError::Stream("boom".to_string()))
        });
        assert!(result.is_err());
    }
}
