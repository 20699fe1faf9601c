//! テスト用の補完クライアント

use super::*;
use std::sync::Mutex;

/// 決まった応答を返す補完クライアント
pub struct MockCompletion {
    reply: Option<String>,
    requests: Mutex<Vec<(String, String)>>,
}

impl MockCompletion {
    /// 常に `reply` を返す
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// 常に 500 で失敗する
    pub fn failing() -> Self {
        Self {
            reply: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// 受け取った (system, message) の一覧
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }
}

impl CompletionClient for MockCompletion {
    fn complete<'a>(
        &'a self,
        system: &'a str,
        message: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
        Box::pin(async move {
            self.requests
                .lock()
                .unwrap()
                .push((system.to_string(), message.to_string()));

            self.reply.clone().ok_or_else(|| TimError::Completion {
                status: 500,
                message: "unavailable".to_string(),
            })
        })
    }
}
