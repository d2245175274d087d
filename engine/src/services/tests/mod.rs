//! Tests for engine services
//!
//! The geocoder is exercised against a local mock HTTP server and the JSON
//! table against a temporary directory; nothing here touches the network.
