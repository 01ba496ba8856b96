//! parley: an LLM language tutor with mistake tracking, plus JudgeBot, a
//! two-party conflict arbiter.

pub mod app;
pub mod config;
pub mod error;
pub mod export;
pub mod judge;
pub mod llm;
pub mod session;
pub mod speech;
pub mod store;
pub mod tutor;
