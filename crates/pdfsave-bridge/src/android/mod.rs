// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Android platform bridge via JNI.
//
// Requires the Android NDK and targets `aarch64-linux-android` or
// `armv7-linux-androideabi`. Each trait method invokes the corresponding
// Android API through JNI calls into the ART runtime.
//
// ## Architecture notes
//
// ContentResolver, permission checks, toasts and directory lookups complete
// synchronously via JNI. The permission dialog does not: the host Activity
// must forward `onRequestPermissionsResult` to
// `MainActivity.nativeOnPermissionResult(requestCode, granted)`, which
// resolves the pending `PermissionRequest`, and call
// `MainActivity.nativeOnResume()` from `onResume` so a request whose result
// was never forwarded resolves as denied. See `ANDROID-INTEGRATION.md` for
// the Kotlin glue.

#![cfg(target_os = "android")]

use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;

use jni::objects::{GlobalRef, JObject, JString, JValue};
use jni::sys::{jboolean, jint};
use jni::{JNIEnv, JavaVM};

use pdfsave_core::error::{PdfSaveError, Result};
use pdfsave_core::{
    ContentUri, LOG_TARGET, MediaEntry, Notification, PlatformVersion, ToastDuration,
};

use crate::permission::{PendingPermissions, PermissionRequest, STORAGE_PERMISSION_CODE};
use crate::traits::*;

// ---------------------------------------------------------------------------
// JNI bootstrap helpers
// ---------------------------------------------------------------------------

const WRITE_EXTERNAL_STORAGE: &str = "android.permission.WRITE_EXTERNAL_STORAGE";

/// `PackageManager.PERMISSION_GRANTED`.
const PERMISSION_GRANTED: jint = 0;

/// `Toast.LENGTH_SHORT` / `Toast.LENGTH_LONG`.
const TOAST_LENGTH_SHORT: jint = 0;
const TOAST_LENGTH_LONG: jint = 1;

static JAVA_VM: OnceLock<JavaVM> = OnceLock::new();

/// Responder for the permission dialog currently on screen.
static PENDING_PERMISSIONS: PendingPermissions = PendingPermissions::new();

/// Obtain the process-wide [`JavaVM`] set up by the NDK glue code.
fn java_vm() -> Result<&'static JavaVM> {
    if let Some(vm) = JAVA_VM.get() {
        return Ok(vm);
    }
    let ctx = ndk_context::android_context();
    // SAFETY: `ctx.vm()` returns the `JavaVM*` set by the NDK glue code.
    // The pointer is guaranteed valid for the lifetime of the process.
    let vm = unsafe { JavaVM::from_raw(ctx.vm().cast()) }
        .map_err(|e| PdfSaveError::Bridge(format!("failed to obtain JavaVM: {e}")))?;
    Ok(JAVA_VM.get_or_init(|| vm))
}

/// Obtain a [`JNIEnv`] for the current thread, attaching it if needed.
fn jni_env() -> Result<JNIEnv<'static>> {
    java_vm()?
        .attach_current_thread_permanently()
        .map_err(|e| PdfSaveError::Bridge(format!("failed to attach JNI thread: {e}")))
}

/// Obtain the current Android `Activity` as a [`JObject`].
fn activity() -> Result<JObject<'static>> {
    let ctx = ndk_context::android_context();
    let ptr = ctx.context();
    if ptr.is_null() {
        return Err(PdfSaveError::Bridge(
            "Android context is null — native activity not initialised".into(),
        ));
    }
    // SAFETY: the NDK guarantees this pointer is a valid global jobject for
    // the hosting Activity.
    Ok(unsafe { JObject::from_raw(ptr.cast()) })
}

/// Convenience: map any `jni::errors::Error` into `PdfSaveError::Bridge`,
/// clearing a pending Java exception so later calls on this thread work.
fn jni_err(env: &mut JNIEnv<'_>, context: &str, e: jni::errors::Error) -> PdfSaveError {
    clear_exception(env);
    PdfSaveError::Bridge(format!("{context}: {e}"))
}

fn clear_exception(env: &mut JNIEnv<'_>) {
    if env.exception_check().unwrap_or(false) {
        let _ = env.exception_describe();
        let _ = env.exception_clear();
    }
}

/// Deliver the result of the write-storage permission dialog.
///
/// Returns `false` when no matching request is pending.
pub fn deliver_permission_result(request_code: i32, granted: bool) -> bool {
    tracing::debug!(target: LOG_TARGET, request_code, granted, "permission result delivered");
    PENDING_PERMISSIONS.deliver(request_code, granted)
}

/// JNI entry point called from `MainActivity.onRequestPermissionsResult`.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_hyperpolymath_pdfsave_MainActivity_nativeOnPermissionResult(
    _env: JNIEnv<'_>,
    _this: JObject<'_>,
    request_code: jint,
    granted: jboolean,
) {
    deliver_permission_result(request_code, granted != 0);
}

/// JNI entry point called from `MainActivity.onResume`.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_hyperpolymath_pdfsave_MainActivity_nativeOnResume(
    _env: JNIEnv<'_>,
    _this: JObject<'_>,
) {
    PENDING_PERMISSIONS.deny_unanswered();
}

// ---------------------------------------------------------------------------
// Bridge struct
// ---------------------------------------------------------------------------

/// Android implementation of the PDF Save platform bridge.
///
/// All state lives on the Java side apart from the cached API level.
pub struct AndroidBridge {
    sdk_int: OnceLock<u32>,
}

impl AndroidBridge {
    /// Create a new Android bridge.
    ///
    /// This does **not** touch JNI — the first JNI call happens lazily when
    /// a trait method is invoked.
    pub fn new() -> Self {
        Self {
            sdk_int: OnceLock::new(),
        }
    }

    fn read_sdk_int() -> Result<u32> {
        let mut env = jni_env()?;
        let sdk = env
            .get_static_field("android/os/Build$VERSION", "SDK_INT", "I")
            .and_then(|v| v.i())
            .map_err(|e| jni_err(&mut env, "Build.VERSION.SDK_INT", e))?;
        Ok(sdk.max(0) as u32)
    }
}

impl Default for AndroidBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformBridge for AndroidBridge {
    fn platform_name(&self) -> &str {
        "Android"
    }

    fn platform_version(&self) -> PlatformVersion {
        let sdk = *self.sdk_int.get_or_init(|| match Self::read_sdk_int() {
            Ok(sdk) => sdk,
            Err(e) => {
                tracing::error!(target: LOG_TARGET, error = %e, "could not read SDK_INT");
                0
            }
        });
        PlatformVersion(sdk)
    }
}

// ---------------------------------------------------------------------------
// NativeMediaIndex — MediaStore.Downloads via ContentResolver
// ---------------------------------------------------------------------------

impl NativeMediaIndex for AndroidBridge {
    /// `resolver.insert(MediaStore.Downloads.EXTERNAL_CONTENT_URI, values)`.
    fn insert_download(&self, entry: &MediaEntry) -> Result<Option<ContentUri>> {
        let mut env = jni_env()?;
        let activity = activity()?;

        tracing::info!(
            target: LOG_TARGET,
            display_name = %entry.display_name,
            relative_path = %entry.relative_path,
            "Android: inserting MediaStore download"
        );

        let values: JObject = env
            .new_object("android/content/ContentValues", "()V", &[])
            .map_err(|e| jni_err(&mut env, "new ContentValues", e))?;

        for (key, value) in [
            ("_display_name", entry.display_name.as_str()),
            ("mime_type", entry.mime_type.as_str()),
            ("relative_path", entry.relative_path.as_str()),
        ] {
            let j_key: JString = env
                .new_string(key)
                .map_err(|e| jni_err(&mut env, "new_string(key)", e))?;
            let j_value: JString = env
                .new_string(value)
                .map_err(|e| jni_err(&mut env, "new_string(value)", e))?;
            env.call_method(
                &values,
                "put",
                "(Ljava/lang/String;Ljava/lang/String;)V",
                &[JValue::Object(&j_key), JValue::Object(&j_value)],
            )
            .map_err(|e| jni_err(&mut env, "ContentValues.put", e))?;
        }

        let collection: JObject = env
            .get_static_field(
                "android/provider/MediaStore$Downloads",
                "EXTERNAL_CONTENT_URI",
                "Landroid/net/Uri;",
            )
            .and_then(|v| v.l())
            .map_err(|e| jni_err(&mut env, "MediaStore.Downloads.EXTERNAL_CONTENT_URI", e))?;

        let resolver = content_resolver(&mut env, &activity)?;
        let uri: JObject = env
            .call_method(
                &resolver,
                "insert",
                "(Landroid/net/Uri;Landroid/content/ContentValues;)Landroid/net/Uri;",
                &[JValue::Object(&collection), JValue::Object(&values)],
            )
            .and_then(|v| v.l())
            .map_err(|e| jni_err(&mut env, "ContentResolver.insert", e))?;

        if uri.is_null() {
            tracing::error!(target: LOG_TARGET, "Android: MediaStore insert returned null");
            return Ok(None);
        }

        let j_uri_str: JObject = env
            .call_method(&uri, "toString", "()Ljava/lang/String;", &[])
            .and_then(|v| v.l())
            .map_err(|e| jni_err(&mut env, "Uri.toString", e))?;
        let uri_string: String = env
            .get_string(&JString::from(j_uri_str))
            .map_err(|e| jni_err(&mut env, "get_string(uri)", e))?
            .into();

        Ok(Some(ContentUri(uri_string)))
    }

    /// `resolver.openOutputStream(uri)` wrapped as a Rust [`Write`].
    fn open_output(&self, uri: &ContentUri) -> Result<Option<MediaSink>> {
        let mut env = jni_env()?;
        let activity = activity()?;

        let j_uri_str: JString = env
            .new_string(uri.as_str())
            .map_err(|e| jni_err(&mut env, "new_string(uri)", e))?;
        let uri_obj: JObject = env
            .call_static_method(
                "android/net/Uri",
                "parse",
                "(Ljava/lang/String;)Landroid/net/Uri;",
                &[JValue::Object(&j_uri_str)],
            )
            .and_then(|v| v.l())
            .map_err(|e| jni_err(&mut env, "Uri.parse", e))?;

        let resolver = content_resolver(&mut env, &activity)?;
        let stream: JObject = env
            .call_method(
                &resolver,
                "openOutputStream",
                "(Landroid/net/Uri;)Ljava/io/OutputStream;",
                &[JValue::Object(&uri_obj)],
            )
            .and_then(|v| v.l())
            .map_err(|e| jni_err(&mut env, "ContentResolver.openOutputStream", e))?;

        if stream.is_null() {
            tracing::error!(target: LOG_TARGET, %uri, "Android: openOutputStream returned null");
            return Ok(None);
        }

        let stream = env
            .new_global_ref(&stream)
            .map_err(|e| jni_err(&mut env, "new_global_ref(OutputStream)", e))?;

        Ok(Some(Box::new(JavaOutputStream {
            stream,
            closed: false,
        })))
    }
}

/// `java.io.OutputStream` exposed as [`Write`]. Closed by `finish`, or on drop.
struct JavaOutputStream {
    stream: GlobalRef,
    closed: bool,
}

fn io_err(context: &str, e: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(format!("{context}: {e}"))
}

impl Write for JavaOutputStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut env = jni_env().map_err(|e| io_err("jni_env", e))?;
        let array = env
            .byte_array_from_slice(buf)
            .map_err(|e| io_err("byte_array_from_slice", e))?;
        env.call_method(
            self.stream.as_obj(),
            "write",
            "([B)V",
            &[JValue::Object(&array)],
        )
        .map_err(|e| {
            clear_exception(&mut env);
            io_err("OutputStream.write", e)
        })?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        let mut env = jni_env().map_err(|e| io_err("jni_env", e))?;
        env.call_method(self.stream.as_obj(), "flush", "()V", &[])
            .map_err(|e| {
                clear_exception(&mut env);
                io_err("OutputStream.flush", e)
            })?;
        Ok(())
    }
}

impl JavaOutputStream {
    /// `OutputStream.close()`, at most once.
    fn close(&mut self) -> std::io::Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        let mut env = jni_env().map_err(|e| io_err("jni_env", e))?;
        env.call_method(self.stream.as_obj(), "close", "()V", &[])
            .map_err(|e| {
                clear_exception(&mut env);
                io_err("OutputStream.close", e)
            })?;
        Ok(())
    }
}

impl MediaStream for JavaOutputStream {
    fn finish(mut self: Box<Self>) -> std::io::Result<()> {
        self.close()
    }
}

impl Drop for JavaOutputStream {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::error!(target: LOG_TARGET, error = %e, "OutputStream.close failed");
        }
    }
}

// ---------------------------------------------------------------------------
// NativePermissions — ContextCompat / ActivityCompat
// ---------------------------------------------------------------------------

impl NativePermissions for AndroidBridge {
    fn check_write_storage(&self) -> PermissionStatus {
        let check = || -> Result<bool> {
            let mut env = jni_env()?;
            let activity = activity()?;
            let j_perm: JString = env
                .new_string(WRITE_EXTERNAL_STORAGE)
                .map_err(|e| jni_err(&mut env, "new_string(permission)", e))?;
            let result = env
                .call_static_method(
                    "androidx/core/content/ContextCompat",
                    "checkSelfPermission",
                    "(Landroid/content/Context;Ljava/lang/String;)I",
                    &[JValue::Object(&activity), JValue::Object(&j_perm)],
                )
                .and_then(|v| v.i())
                .map_err(|e| jni_err(&mut env, "ContextCompat.checkSelfPermission", e))?;
            Ok(result == PERMISSION_GRANTED)
        };

        match check() {
            Ok(granted) => PermissionStatus::from_granted(granted),
            Err(e) => {
                tracing::error!(target: LOG_TARGET, error = %e, "permission check failed");
                PermissionStatus::Denied
            }
        }
    }

    fn should_show_rationale(&self) -> bool {
        let query = || -> Result<bool> {
            let mut env = jni_env()?;
            let activity = activity()?;
            let j_perm: JString = env
                .new_string(WRITE_EXTERNAL_STORAGE)
                .map_err(|e| jni_err(&mut env, "new_string(permission)", e))?;
            env.call_static_method(
                "androidx/core/app/ActivityCompat",
                "shouldShowRequestPermissionRationale",
                "(Landroid/app/Activity;Ljava/lang/String;)Z",
                &[JValue::Object(&activity), JValue::Object(&j_perm)],
            )
            .and_then(|v| v.z())
            .map_err(|e| jni_err(&mut env, "ActivityCompat.shouldShowRequestPermissionRationale", e))
        };

        query().unwrap_or_else(|e| {
            tracing::warn!(target: LOG_TARGET, error = %e, "rationale query failed");
            false
        })
    }

    /// Dispatch `ActivityCompat.requestPermissions`. The answer arrives via
    /// [`deliver_permission_result`].
    fn request_write_storage(&self) -> Result<PermissionRequest> {
        let mut env = jni_env()?;
        let activity = activity()?;

        let string_class = env
            .find_class("java/lang/String")
            .map_err(|e| jni_err(&mut env, "find_class(String)", e))?;
        let j_perm: JString = env
            .new_string(WRITE_EXTERNAL_STORAGE)
            .map_err(|e| jni_err(&mut env, "new_string(permission)", e))?;
        let permissions = env
            .new_object_array(1, &string_class, &j_perm)
            .map_err(|e| jni_err(&mut env, "new_object_array(permissions)", e))?;

        // Register before dispatching so a fast answer cannot be lost.
        let request = PENDING_PERMISSIONS.register(STORAGE_PERMISSION_CODE);

        env.call_static_method(
            "androidx/core/app/ActivityCompat",
            "requestPermissions",
            "(Landroid/app/Activity;[Ljava/lang/String;I)V",
            &[
                JValue::Object(&activity),
                JValue::Object(&permissions),
                JValue::Int(STORAGE_PERMISSION_CODE),
            ],
        )
        .map_err(|e| jni_err(&mut env, "ActivityCompat.requestPermissions", e))?;

        tracing::info!(
            target: LOG_TARGET,
            request_code = STORAGE_PERMISSION_CODE,
            "Android: permission dialog dispatched — awaiting onRequestPermissionsResult"
        );
        Ok(request)
    }
}

// ---------------------------------------------------------------------------
// NativeNotifier — android.widget.Toast
// ---------------------------------------------------------------------------

impl NativeNotifier for AndroidBridge {
    fn show_notification(&self, notification: &Notification) {
        let show = || -> Result<()> {
            let mut env = jni_env()?;
            let activity = activity()?;
            let j_text: JString = env
                .new_string(&notification.text)
                .map_err(|e| jni_err(&mut env, "new_string(toast)", e))?;
            let length = match notification.duration {
                ToastDuration::Short => TOAST_LENGTH_SHORT,
                ToastDuration::Long => TOAST_LENGTH_LONG,
            };
            let toast: JObject = env
                .call_static_method(
                    "android/widget/Toast",
                    "makeText",
                    "(Landroid/content/Context;Ljava/lang/CharSequence;I)Landroid/widget/Toast;",
                    &[
                        JValue::Object(&activity),
                        JValue::Object(&j_text),
                        JValue::Int(length),
                    ],
                )
                .and_then(|v| v.l())
                .map_err(|e| jni_err(&mut env, "Toast.makeText", e))?;
            env.call_method(&toast, "show", "()V", &[])
                .map_err(|e| jni_err(&mut env, "Toast.show", e))?;
            Ok(())
        };

        if let Err(e) = show() {
            tracing::error!(target: LOG_TARGET, error = %e, text = %notification.text, "toast failed");
        }
    }
}

// ---------------------------------------------------------------------------
// NativeStorageDirs — android.os.Environment
// ---------------------------------------------------------------------------

impl NativeStorageDirs for AndroidBridge {
    fn public_downloads_dir(&self) -> Result<PathBuf> {
        let mut env = jni_env()?;

        let j_type: JObject = env
            .get_static_field(
                "android/os/Environment",
                "DIRECTORY_DOWNLOADS",
                "Ljava/lang/String;",
            )
            .and_then(|v| v.l())
            .map_err(|e| jni_err(&mut env, "Environment.DIRECTORY_DOWNLOADS", e))?;

        let dir: JObject = env
            .call_static_method(
                "android/os/Environment",
                "getExternalStoragePublicDirectory",
                "(Ljava/lang/String;)Ljava/io/File;",
                &[JValue::Object(&j_type)],
            )
            .and_then(|v| v.l())
            .map_err(|e| jni_err(&mut env, "getExternalStoragePublicDirectory", e))?;

        let j_path: JObject = env
            .call_method(&dir, "getAbsolutePath", "()Ljava/lang/String;", &[])
            .and_then(|v| v.l())
            .map_err(|e| jni_err(&mut env, "File.getAbsolutePath", e))?;
        let path: String = env
            .get_string(&JString::from(j_path))
            .map_err(|e| jni_err(&mut env, "get_string(path)", e))?
            .into();

        Ok(PathBuf::from(path))
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// `activity.getContentResolver()`.
fn content_resolver<'a>(env: &mut JNIEnv<'a>, activity: &JObject<'_>) -> Result<JObject<'a>> {
    env.call_method(
        activity,
        "getContentResolver",
        "()Landroid/content/ContentResolver;",
        &[],
    )
    .and_then(|v| v.l())
    .map_err(|e| jni_err(env, "getContentResolver", e))
}
