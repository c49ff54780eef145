//! # healthops-network
//!
//! 외부 AI chat-completions 어댑터.
//! [`ChatCompletionClient`](healthops_core::ports::chat_completion::ChatCompletionClient)
//! 포트를 `reqwest`로 구현한다.
//!
//! ## 사용 예시
//!
//! ```rust,ignore
//! use healthops_network::ai_chat_client::RemoteChatClient;
//!
//! let client = RemoteChatClient::new(&config.ai)?;
//! ```

pub mod ai_chat_client;
