//! # Conversation Handler Tests
//!
//! Test suite for conversation endpoints, driven through the full router
//! (auth middleware included) against an in-memory database.

mod group;

pub(crate) use crate::test_support::{
    authed_request, read_json, setup_test_db, test_app, ErrorBody,
};
