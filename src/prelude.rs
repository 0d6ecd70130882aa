/*

    This is intended to quickly import commonly used items across
    the ray tracing crate.

*/

// Almost every module logs, so the macros live here
pub use smart_default::SmartDefault;
pub use std::sync::Arc;
pub use tracing::{debug, error, info, warn};

pub use serde::Deserialize;

pub use crate::numeric::*;
