// Axel Android JNI Library
// Exposes the Rust gyroscope chart and recording core to the activities via JNI

pub mod android_jni;
pub mod error;
pub mod logging;

pub use error::{BridgeError, JResult};
