use crate::error::{throw_java_exception, BridgeError, JResult};
use crate::logging::init_logging;
use axel_rs::chart::paint_table;
use axel_rs::config::AppConfig;
use axel_rs::controller::{MainController, RecordAction};
use axel_rs::preferences::JsonPreferences;
use axel_rs::sensors::GyroSample;
use axel_rs::storage::ShareRequest;
use chrono::Local;
use jni::objects::{JClass, JObject, JString};
use jni::sys::{
    jboolean, jfloat, jfloatArray, jint, jintArray, jlong, jobjectArray, jstring, JNI_FALSE, JNI_TRUE,
};
use jni::JNIEnv;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub const CONFIG_FILE: &str = "axel.json";

// Global controller - JNI entry points are free functions
lazy_static::lazy_static! {
    static ref GLOBAL_CONTROLLER: Mutex<Option<MainController>> = Mutex::new(None);
}

/// Run `f` against the initialized controller
fn with_controller<T>(f: impl FnOnce(&mut MainController) -> JResult<T>) -> JResult<T> {
    let mut guard = GLOBAL_CONTROLLER.lock().map_err(|_| {
        BridgeError::Internal("Failed to acquire global controller lock".to_string())
    })?;
    let controller = guard.as_mut().ok_or(BridgeError::NotInitialized)?;
    f(controller)
}

/// Build a controller for the app's cache and files directories
pub fn build_controller(cache_dir: &Path, files_dir: &Path) -> JResult<MainController> {
    let config = AppConfig::load(&files_dir.join(CONFIG_FILE))?;
    let prefs = JsonPreferences::open(files_dir, &config.preferences.group);
    Ok(MainController::new(config, cache_dir, Box::new(prefs)))
}

/// Record-button outcome as `[buttonLabel, toast, defaultFileName]`, empty when absent
pub fn record_action_strings(action: &RecordAction) -> [String; 3] {
    match action {
        RecordAction::Started {
            button_label,
            notice,
        } => [
            button_label.to_string(),
            notice.message().to_string(),
            String::new(),
        ],
        RecordAction::Stopped {
            button_label,
            default_name,
        } => [button_label.to_string(), String::new(), default_name.clone()],
    }
}

/// Share request as `[path, mimeType, authority, chooserTitle]`
pub fn share_request_strings(request: &ShareRequest) -> [String; 4] {
    [
        request.path.display().to_string(),
        request.mime_type.clone(),
        request.authority.clone(),
        request.chooser_title.clone(),
    ]
}

fn validate_dimensions(width: f32, height: f32) -> JResult<()> {
    if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
        return Err(BridgeError::InvalidParameters(format!(
            "view size {}x{}",
            width, height
        )));
    }
    Ok(())
}

fn new_string_array(env: &mut JNIEnv, values: &[String]) -> JResult<jobjectArray> {
    let array = env.new_object_array(values.len() as i32, "java/lang/String", JObject::null())?;
    for (i, value) in values.iter().enumerate() {
        let jstr = env.new_string(value)?;
        env.set_object_array_element(&array, i as i32, jstr)?;
    }
    Ok(array.into_raw())
}

fn new_float_array(env: &mut JNIEnv, values: &[f32]) -> JResult<jfloatArray> {
    let array = env.new_float_array(values.len() as i32)?;
    env.set_float_array_region(&array, 0, values)?;
    Ok(array.into_raw())
}

fn new_int_array(env: &mut JNIEnv, values: &[i32]) -> JResult<jintArray> {
    let array = env.new_int_array(values.len() as i32)?;
    env.set_int_array_region(&array, 0, values)?;
    Ok(array.into_raw())
}

/// JNI: Initialize the native core
/// Parameters: cacheDir (recordings), filesDir (preferences, optional axel.json)
/// Returns: 0 on success, -1 on error (throws Java exception)
#[no_mangle]
pub extern "C" fn Java_com_example_axel_NativeBridge_init(
    mut env: JNIEnv,
    _class: JClass,
    cache_dir: JString,
    files_dir: JString,
) -> jint {
    init_logging();
    match init_impl(&mut env, &cache_dir, &files_dir) {
        Ok(_) => 0,
        Err(e) => {
            let _ = throw_java_exception(&mut env, &e);
            -1
        }
    }
}

fn init_impl(env: &mut JNIEnv, cache_dir: &JString, files_dir: &JString) -> JResult<()> {
    let cache_dir: String = env.get_string(cache_dir)?.into();
    let files_dir: String = env.get_string(files_dir)?.into();
    let controller = build_controller(&PathBuf::from(&cache_dir), &PathBuf::from(&files_dir))?;

    let mut guard = GLOBAL_CONTROLLER.lock().map_err(|_| {
        BridgeError::Internal("Failed to acquire global controller lock".to_string())
    })?;
    if guard.is_some() {
        // Activity recreated (rotation); keep chart and recording state
        log::info!("Native bridge already initialized");
        return Ok(());
    }
    *guard = Some(controller);
    log::info!("Native bridge initialized, cache dir {}", cache_dir);
    Ok(())
}

/// JNI: Activity resumed, gyroscope listener registered
#[no_mangle]
pub extern "C" fn Java_com_example_axel_NativeBridge_onResume(mut env: JNIEnv, _class: JClass) -> jint {
    match with_controller(|c| {
        c.on_resume();
        Ok(())
    }) {
        Ok(_) => 0,
        Err(e) => {
            let _ = throw_java_exception(&mut env, &e);
            -1
        }
    }
}

/// JNI: Activity paused, gyroscope listener unregistered
#[no_mangle]
pub extern "C" fn Java_com_example_axel_NativeBridge_onPause(mut env: JNIEnv, _class: JClass) -> jint {
    match with_controller(|c| {
        c.on_pause();
        Ok(())
    }) {
        Ok(_) => 0,
        Err(e) => {
            let _ = throw_java_exception(&mut env, &e);
            -1
        }
    }
}

/// JNI: Gyroscope SensorEvent
/// Parameters: x, y, z (rad/s), timestamp (SensorEvent.timestamp, ns)
/// Returns: String[3] axis labels, or null while paused
#[no_mangle]
pub extern "C" fn Java_com_example_axel_NativeBridge_onGyroscope(
    mut env: JNIEnv,
    _class: JClass,
    x: jfloat,
    y: jfloat,
    z: jfloat,
    timestamp: jlong,
) -> jobjectArray {
    let result = with_controller(|c| {
        Ok(c.on_sensor_changed(GyroSample::new(x, y, z, timestamp), Local::now()))
    })
    .and_then(|labels| match labels {
        Some(labels) => new_string_array(&mut env, &labels.into_array()),
        None => Ok(std::ptr::null_mut()),
    });

    match result {
        Ok(array) => array,
        Err(e) => {
            let _ = throw_java_exception(&mut env, &e);
            std::ptr::null_mut()
        }
    }
}

/// JNI: Record button clicked
/// Returns: String[3] = [buttonLabel, toast or "", defaultFileName or ""]
/// A non-empty defaultFileName means the save dialog should open.
#[no_mangle]
pub extern "C" fn Java_com_example_axel_NativeBridge_onRecordClicked(
    mut env: JNIEnv,
    _class: JClass,
) -> jobjectArray {
    let result = with_controller(|c| Ok(c.on_record_clicked(Local::now())?))
        .and_then(|action| new_string_array(&mut env, &record_action_strings(&action)));

    match result {
        Ok(array) => array,
        Err(e) => {
            let _ = throw_java_exception(&mut env, &e);
            std::ptr::null_mut()
        }
    }
}

/// JNI: Save dialog confirmed
/// Returns: String[4] = [path, mimeType, authority, chooserTitle]
/// Throws IOException carrying the toast text on failure.
#[no_mangle]
pub extern "C" fn Java_com_example_axel_NativeBridge_saveRecording(
    mut env: JNIEnv,
    _class: JClass,
    name: JString,
) -> jobjectArray {
    let result = env
        .get_string(&name)
        .map(String::from)
        .map_err(BridgeError::from)
        .and_then(|name| {
            with_controller(|c| {
                c.on_save_confirmed(&name, Local::now())
                    .map_err(|notice| BridgeError::Rejected(notice.message()))
            })
        })
        .and_then(|request| new_string_array(&mut env, &share_request_strings(&request)));

    match result {
        Ok(array) => array,
        Err(e) => {
            let _ = throw_java_exception(&mut env, &e);
            std::ptr::null_mut()
        }
    }
}

/// JNI: Save dialog cancelled
#[no_mangle]
pub extern "C" fn Java_com_example_axel_NativeBridge_cancelSave(mut env: JNIEnv, _class: JClass) -> jint {
    match with_controller(|c| {
        c.on_save_cancelled();
        Ok(())
    }) {
        Ok(_) => 0,
        Err(e) => {
            let _ = throw_java_exception(&mut env, &e);
            -1
        }
    }
}

/// JNI: Chart lines for the current view size
/// Returns: float[] of `[style, x0, y0, x1, y1]` records
#[no_mangle]
pub extern "C" fn Java_com_example_axel_NativeBridge_chartFrame(
    mut env: JNIEnv,
    _class: JClass,
    width: jfloat,
    height: jfloat,
) -> jfloatArray {
    let result = validate_dimensions(width, height)
        .and_then(|_| with_controller(|c| Ok(c.chart_frame(width, height).to_draw_commands())))
        .and_then(|commands| new_float_array(&mut env, &commands));

    match result {
        Ok(array) => array,
        Err(e) => {
            let _ = throw_java_exception(&mut env, &e);
            std::ptr::null_mut()
        }
    }
}

/// JNI: Axis labels for the current view size
/// Returns: String[] of texts; anchors come from chartLabelAnchors
#[no_mangle]
pub extern "C" fn Java_com_example_axel_NativeBridge_chartLabels(
    mut env: JNIEnv,
    _class: JClass,
    width: jfloat,
    height: jfloat,
) -> jobjectArray {
    let result = validate_dimensions(width, height)
        .and_then(|_| {
            with_controller(|c| {
                Ok(c
                    .chart_labels(width, height)
                    .into_iter()
                    .map(|l| l.text)
                    .collect::<Vec<_>>())
            })
        })
        .and_then(|texts| new_string_array(&mut env, &texts));

    match result {
        Ok(array) => array,
        Err(e) => {
            let _ = throw_java_exception(&mut env, &e);
            std::ptr::null_mut()
        }
    }
}

/// JNI: Label anchors matching chartLabels
/// Returns: float[] of `[x, y]` pairs
#[no_mangle]
pub extern "C" fn Java_com_example_axel_NativeBridge_chartLabelAnchors(
    mut env: JNIEnv,
    _class: JClass,
    width: jfloat,
    height: jfloat,
) -> jfloatArray {
    let result = validate_dimensions(width, height)
        .and_then(|_| {
            with_controller(|c| {
                Ok(c
                    .chart_labels(width, height)
                    .iter()
                    .flat_map(|l| [l.anchor.x, l.anchor.y])
                    .collect::<Vec<_>>())
            })
        })
        .and_then(|anchors| new_float_array(&mut env, &anchors));

    match result {
        Ok(array) => array,
        Err(e) => {
            let _ = throw_java_exception(&mut env, &e);
            std::ptr::null_mut()
        }
    }
}

/// JNI: Paints for chartFrame style codes and the labels
/// Returns: int[] of `[code, argb, size]` records; size is the stroke width,
/// or the text size for the label record
#[no_mangle]
pub extern "C" fn Java_com_example_axel_NativeBridge_chartPaints(
    mut env: JNIEnv,
    _class: JClass,
) -> jintArray {
    match new_int_array(&mut env, &paint_table()) {
        Ok(array) => array,
        Err(e) => {
            let _ = throw_java_exception(&mut env, &e);
            std::ptr::null_mut()
        }
    }
}

/// JNI: KeepScreenOn for the main window (on settings open and on return)
#[no_mangle]
pub extern "C" fn Java_com_example_axel_NativeBridge_getKeepScreenOn(
    mut env: JNIEnv,
    _class: JClass,
) -> jboolean {
    match with_controller(|c| Ok(c.on_settings_closed().keep_screen_on)) {
        Ok(true) => JNI_TRUE,
        Ok(false) => JNI_FALSE,
        Err(e) => {
            let _ = throw_java_exception(&mut env, &e);
            JNI_FALSE
        }
    }
}

/// JNI: Settings checkbox toggled. A failed write is logged, not thrown.
/// Returns: 0 on success, -1 when the bridge is not initialized
#[no_mangle]
pub extern "C" fn Java_com_example_axel_NativeBridge_setKeepScreenOn(
    mut env: JNIEnv,
    _class: JClass,
    checked: jboolean,
) -> jint {
    match with_controller(|c| Ok(c.settings().toggle(checked != JNI_FALSE))) {
        Ok(_) => 0,
        Err(e) => {
            let _ = throw_java_exception(&mut env, &e);
            -1
        }
    }
}

/// JNI: Name to pre-fill in the save dialog
/// Returns: file name without extension, "" when no recording awaits a name
#[no_mangle]
pub extern "C" fn Java_com_example_axel_NativeBridge_pendingFileName(
    mut env: JNIEnv,
    _class: JClass,
) -> jstring {
    let result = with_controller(|c| Ok(c.pending_default_name().unwrap_or_default().to_string()))
        .and_then(|name| Ok(env.new_string(name)?.into_raw()));

    match result {
        Ok(jstr) => jstr,
        Err(e) => {
            let _ = throw_java_exception(&mut env, &e);
            std::ptr::null_mut()
        }
    }
}
