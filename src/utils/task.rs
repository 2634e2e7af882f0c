//! Detached execution of `'static` futures.

use std::future::Future;

/// Runs `future` to completion in the background.
///
/// In the browser the future is queued on the page's microtask loop. On
/// native targets it is driven on its own thread with `pollster`.
#[cfg(target_arch = "wasm32")]
pub fn spawn(future: impl Future<Output = ()> + 'static) {
    wasm_bindgen_futures::spawn_local(future);
}

#[cfg(not(target_arch = "wasm32"))]
pub fn spawn(future: impl Future<Output = ()> + Send + 'static) {
    let spawned = std::thread::Builder::new()
        .name("kinescope-load".into())
        .spawn(move || pollster::block_on(future));
    if let Err(e) = spawned {
        log::error!("Failed to spawn load thread: {e}");
    }
}
