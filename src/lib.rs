//! celeste - stream chat bot core.
//!
//! Lines from the chat gateway flow through a [`session::Session`], which
//! hands each one to the receiver for the current connection phase:
//! authentication, channel join, then chat. The chat receiver tokenizes
//! messages with `celeste_proto`, tracks viewers, and turns `!commands`
//! into [`receivers::Event`]s. Built-in dispatch commands are run by a
//! [`dispatch::Dispatcher`]; `!volume` drives a quartic [`fader::Fader`].

pub mod commands;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod fader;
pub mod receivers;
pub mod session;
pub mod telemetry;
pub mod viewers;
