//! Implementations of [`GraphicsContext`](crate::GraphicsContext) for real graphics APIs.

#[cfg(feature = "glow")]
pub mod gl;
