//! Inbound adapters translating HTTP requests into rule-engine calls while
//! keeping framework details at the edge.

pub mod http;
