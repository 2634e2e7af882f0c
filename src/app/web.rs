//! Browser adapter.
//!
//! ```js
//! import init, { WebViewer } from "./kinescope.js";
//!
//! await init();
//! const viewer = new WebViewer();           // reads ?logref= / ?test=
//! viewer.onModelAdded(json => buildMeshes(JSON.parse(json)));
//! viewer.onRender((ids, matrices) => draw(ids, matrices));
//! viewer.onError(message => showBanner(message));
//! viewer.start("drop-zone");
//! ```
//!
//! Callbacks run while the viewer is busy; they must not call back into the
//! `WebViewer` synchronously.

use std::cell::{Cell, RefCell};
use std::fmt::Display;
use std::rc::Rc;

use js_sys::{Float32Array, Float64Array, Function};
use serde::Serialize;
use slotmap::Key;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{DragEvent, EventTarget};

use crate::config::ViewerConfig;
use crate::loader::LoadSource;
use crate::render::Renderer;
use crate::scene::{Mesh, MeshKey, NodeHandle, Scene};
use crate::utils::logging;
use crate::viewer::{LoadEvent, Viewer};

type SharedViewer = Rc<RefCell<Viewer<JsRenderer>>>;
type ErrorSink = Rc<RefCell<Option<Function>>>;

fn to_js(err: impl Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn mesh_id(key: MeshKey) -> f64 {
    key.data().as_ffi() as f64
}

fn report(sink: &ErrorSink, message: &str) {
    log::error!("{message}");
    if let Some(callback) = sink.borrow().as_ref() {
        let _ = callback.call1(&JsValue::NULL, &JsValue::from_str(message));
    }
}

#[derive(Serialize)]
struct MeshEntry<'a> {
    id: f64,
    #[serde(flatten)]
    mesh: &'a Mesh,
}

/// Forwards scene updates to JavaScript callbacks.
///
/// `render` passes two arrays: mesh ids, and for each id a column-major 4x4
/// world matrix (16 floats).
#[derive(Default)]
pub struct JsRenderer {
    on_render: Option<Function>,
    on_resize: Option<Function>,
    on_model_added: Option<Function>,
    on_model_removed: Option<Function>,

    ids: Vec<f64>,
    matrices: Vec<f32>,
}

impl JsRenderer {
    fn mesh_list(scene: &Scene, root: NodeHandle) -> Vec<MeshEntry<'_>> {
        scene
            .meshes_under(root)
            .into_iter()
            .map(|(key, mesh)| MeshEntry {
                id: mesh_id(key),
                mesh,
            })
            .collect()
    }
}

impl Renderer for JsRenderer {
    fn render(&mut self, scene: &Scene) {
        let Some(callback) = &self.on_render else {
            return;
        };
        self.ids.clear();
        self.matrices.clear();
        for (key, _, world) in scene.iter_visible_meshes() {
            self.ids.push(mesh_id(key));
            self.matrices
                .extend_from_slice(&glam::Mat4::from(*world).to_cols_array());
        }
        let ids = Float64Array::from(&self.ids[..]);
        let matrices = Float32Array::from(&self.matrices[..]);
        if let Err(err) = callback.call2(&JsValue::NULL, &ids, &matrices) {
            log::error!("Render callback failed: {err:?}");
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        if let Some(callback) = &self.on_resize {
            let _ = callback.call2(&JsValue::NULL, &width.into(), &height.into());
        }
    }

    fn on_model_added(&mut self, scene: &Scene, root: NodeHandle) {
        let Some(callback) = &self.on_model_added else {
            return;
        };
        match serde_json::to_string(&Self::mesh_list(scene, root)) {
            Ok(json) => {
                let _ = callback.call1(&JsValue::NULL, &JsValue::from_str(&json));
            }
            Err(err) => log::error!("Failed to serialize meshes: {err}"),
        }
    }

    fn on_model_removed(&mut self, scene: &Scene, root: NodeHandle) {
        let Some(callback) = &self.on_model_removed else {
            return;
        };
        let ids: Vec<f64> = scene.meshes_under(root).into_iter().map(|(key, _)| mesh_id(key)).collect();
        let _ = callback.call1(&JsValue::NULL, &Float64Array::from(&ids[..]));
    }
}

#[wasm_bindgen]
pub struct WebViewer {
    viewer: SharedViewer,
    on_error: ErrorSink,
    started: bool,
}

#[wasm_bindgen]
impl WebViewer {
    /// Creates a viewer configured from the page's query string.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WebViewer, JsValue> {
        logging::init();
        let window = web_sys::window().ok_or_else(|| to_js("no global window"))?;
        let query = window.location().search().unwrap_or_default();
        let config = ViewerConfig::from_query(&query).map_err(to_js)?;
        let viewer = Viewer::new(config, JsRenderer::default()).map_err(to_js)?;

        Ok(Self {
            viewer: Rc::new(RefCell::new(viewer)),
            on_error: Rc::new(RefCell::new(None)),
            started: false,
        })
    }

    #[wasm_bindgen(js_name = onRender)]
    pub fn on_render(&self, callback: Function) {
        self.viewer.borrow_mut().renderer_mut().on_render = Some(callback);
    }

    #[wasm_bindgen(js_name = onResize)]
    pub fn on_resize(&self, callback: Function) {
        self.viewer.borrow_mut().renderer_mut().on_resize = Some(callback);
    }

    #[wasm_bindgen(js_name = onModelAdded)]
    pub fn on_model_added(&self, callback: Function) {
        self.viewer.borrow_mut().renderer_mut().on_model_added = Some(callback);
    }

    #[wasm_bindgen(js_name = onModelRemoved)]
    pub fn on_model_removed(&self, callback: Function) {
        self.viewer.borrow_mut().renderer_mut().on_model_removed = Some(callback);
    }

    /// Receives user-facing load failure messages.
    #[wasm_bindgen(js_name = onError)]
    pub fn on_error(&self, callback: Function) {
        *self.on_error.borrow_mut() = Some(callback);
    }

    /// Installs the drop zone and resize listener, begins the startup load and
    /// starts ticking. Later calls do nothing.
    pub fn start(&mut self, drop_zone_id: Option<String>) -> Result<(), JsValue> {
        if self.started {
            return Ok(());
        }
        let window = web_sys::window().ok_or_else(|| to_js("no global window"))?;
        let document = window.document().ok_or_else(|| to_js("no document"))?;

        let drop_target: EventTarget = match drop_zone_id {
            Some(id) => document
                .get_element_by_id(&id)
                .ok_or_else(|| to_js(format!("drop zone '#{id}' not found")))?
                .into(),
            None => document.into(),
        };
        install_drop_zone(&drop_target, &self.viewer, &self.on_error)?;
        install_resize(&window, &self.viewer)?;

        self.viewer.borrow_mut().start();
        run_loop(self.viewer.clone(), self.on_error.clone())?;
        self.started = true;
        Ok(())
    }

    pub fn play(&self) {
        self.viewer.borrow_mut().play();
    }

    pub fn pause(&self) {
        self.viewer.borrow_mut().pause();
    }

    #[wasm_bindgen(js_name = setSpeed)]
    pub fn set_speed(&self, speed: f64) {
        self.viewer.borrow_mut().set_speed(speed);
    }

    #[wasm_bindgen(js_name = setTime)]
    pub fn set_time(&self, seconds: f64) {
        self.viewer.borrow_mut().set_time(seconds);
    }

    #[wasm_bindgen(js_name = isPlaying)]
    pub fn is_playing(&self) -> bool {
        self.viewer.borrow().is_playing()
    }

    pub fn resize(&self, width: u32, height: u32) {
        self.viewer.borrow_mut().resize(width, height);
    }

    #[wasm_bindgen(js_name = loadUrl)]
    pub fn load_url(&self, url: String) {
        self.viewer.borrow_mut().spawn_load(LoadSource::Url(url));
    }

    #[wasm_bindgen(js_name = loadFixture)]
    pub fn load_fixture(&self, index: usize) {
        self.viewer.borrow_mut().spawn_load(LoadSource::Fixture(index));
    }

    /// Unloads every model.
    pub fn clear(&self) {
        self.viewer.borrow_mut().clear();
    }

    #[wasm_bindgen(js_name = modelCount)]
    pub fn model_count(&self) -> usize {
        self.viewer.borrow().model_count()
    }
}

fn install_drop_zone(target: &EventTarget, viewer: &SharedViewer, on_error: &ErrorSink) -> Result<(), JsValue> {
    let on_drag_over = Closure::<dyn FnMut(DragEvent)>::new(|event: DragEvent| {
        event.prevent_default();
        if let Some(transfer) = event.data_transfer() {
            transfer.set_drop_effect("copy");
        }
    });
    target.add_event_listener_with_callback("dragover", on_drag_over.as_ref().unchecked_ref())?;
    on_drag_over.forget();

    // A later drop supersedes an earlier one whose file is still being read.
    let latest_drop = Rc::new(Cell::new(0_u64));
    let viewer = viewer.clone();
    let on_error = on_error.clone();
    let on_drop = Closure::<dyn FnMut(DragEvent)>::new(move |event: DragEvent| {
        event.prevent_default();
        let Some(file) = event
            .data_transfer()
            .and_then(|transfer| transfer.files())
            .and_then(|files| files.get(0))
        else {
            log::warn!("Drop carried no file");
            return;
        };

        let ticket = latest_drop.get() + 1;
        latest_drop.set(ticket);
        let latest_drop = latest_drop.clone();
        let viewer = viewer.clone();
        let on_error = on_error.clone();

        wasm_bindgen_futures::spawn_local(async move {
            let name = file.name();
            let text = JsFuture::from(file.text()).await;
            if latest_drop.get() != ticket {
                log::debug!("Dropped file '{name}' superseded before it was read");
                return;
            }
            match text.map(|value| value.as_string()) {
                Ok(Some(text)) => viewer
                    .borrow_mut()
                    .spawn_load(LoadSource::DroppedFile { name, text }),
                Ok(None) | Err(_) => report(&on_error, &format!("Could not read dropped file '{name}'.")),
            }
        });
    });
    target.add_event_listener_with_callback("drop", on_drop.as_ref().unchecked_ref())?;
    on_drop.forget();
    Ok(())
}

fn window_size(window: &web_sys::Window) -> Option<(u32, u32)> {
    let width = window.inner_width().ok()?.as_f64()?;
    let height = window.inner_height().ok()?.as_f64()?;
    Some((width as u32, height as u32))
}

fn install_resize(window: &web_sys::Window, viewer: &SharedViewer) -> Result<(), JsValue> {
    if let Some((width, height)) = window_size(window) {
        viewer.borrow_mut().resize(width, height);
    }

    let viewer = viewer.clone();
    let on_resize = Closure::<dyn FnMut()>::new(move || {
        if let Some((width, height)) = web_sys::window().as_ref().and_then(window_size) {
            viewer.borrow_mut().resize(width, height);
        }
    });
    window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
    on_resize.forget();
    Ok(())
}

fn request_frame(callback: &Closure<dyn FnMut()>) -> Result<i32, JsValue> {
    web_sys::window()
        .ok_or_else(|| to_js("no global window"))?
        .request_animation_frame(callback.as_ref().unchecked_ref())
}

/// Commits finished loads and ticks once per animation frame.
fn run_loop(viewer: SharedViewer, on_error: ErrorSink) -> Result<(), JsValue> {
    let frame: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let next = frame.clone();

    *frame.borrow_mut() = Some(Closure::new(move || {
        {
            let mut viewer = viewer.borrow_mut();
            for event in viewer.poll_loads() {
                if let LoadEvent::Failed { error, .. } = event {
                    report(&on_error, &error.user_message());
                }
            }
            viewer.tick();
        }
        if let Some(callback) = next.borrow().as_ref() {
            if let Err(err) = request_frame(callback) {
                log::error!("requestAnimationFrame failed: {err:?}");
            }
        }
    }));

    match frame.borrow().as_ref() {
        Some(callback) => request_frame(callback).map(|_| ()),
        None => Ok(()),
    }
}
