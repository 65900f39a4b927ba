//! Behaviour tests driving the daemon over real TCP connections.

mod support;
