// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! PDF Save — Native platform bridge abstractions.
//!
//! Defines the traits the export workflow uses to reach OS services (shared
//! storage index, permissions, toasts, public directories) and picks the
//! implementation for the target operating system.

pub mod permission;
pub mod traits;

#[cfg(target_os = "android")]
pub mod android;

#[cfg(not(target_os = "android"))]
pub mod stub;

use std::sync::Arc;

/// Retrieves the bridge implementation for the target operating system.
///
/// Returned as an `Arc` so the export controller and both storage writers
/// can share it.
pub fn platform_bridge() -> Arc<dyn traits::PlatformBridge> {
    #[cfg(target_os = "android")]
    {
        // Android: Uses `jni-rs` to invoke methods on the JVM/ART.
        Arc::new(android::AndroidBridge::new())
    }
    #[cfg(not(target_os = "android"))]
    {
        // DESKTOP/CI: legacy-filesystem emulation so the app runs off-device.
        Arc::new(stub::StubBridge::from_env())
    }
}
