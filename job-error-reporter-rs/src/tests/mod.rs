//! Behaviour tests for the job error reporter
//!
//! Reporter tests run against `mockall` mocks of its collaborators; the Sentry
//! client is exercised against a WireMock server.

pub mod sentry_client_tests;
