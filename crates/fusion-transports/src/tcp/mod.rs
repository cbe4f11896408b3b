// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! TCP frame transport
//!
//! - **Server**: binds one port and accepts exactly one peer
//! - **Client**: connects to a running server (host side)

pub mod connection;

#[cfg(feature = "tcp-server")]
pub mod server;

#[cfg(feature = "tcp-client")]
pub mod client;

pub use connection::FrameConnection;

#[cfg(feature = "tcp-server")]
pub use server::TcpFrameServer;

#[cfg(feature = "tcp-client")]
pub use client::TcpFrameClient;
