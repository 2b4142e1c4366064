use wallboard_core::refresh::FetchError;
use wallboard_core::snapshot::WallboardSnapshot;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

/// GET the snapshot endpoint in CORS mode. The request (body included) is
/// aborted once `timeout_ms` elapses.
pub async fn fetch_snapshot(
    endpoint: &str,
    timeout_ms: u64,
) -> Result<WallboardSnapshot, FetchError> {
    let window = web_sys::window().ok_or_else(|| FetchError::Network("no window".into()))?;

    let controller = web_sys::AbortController::new().map_err(network)?;
    let signal = controller.signal();
    let opts = web_sys::RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(web_sys::RequestMode::Cors);
    opts.set_signal(Some(&signal));
    let request = web_sys::Request::new_with_str_and_init(endpoint, &opts).map_err(network)?;
    request
        .headers()
        .set("Accept", "application/json")
        .map_err(network)?;

    let abort = Closure::<dyn FnMut()>::new(move || controller.abort());
    let timeout = i32::try_from(timeout_ms).unwrap_or(i32::MAX);
    let timer = window
        .set_timeout_with_callback_and_timeout_and_arguments_0(
            abort.as_ref().unchecked_ref(),
            timeout,
        )
        .map_err(network)?;

    let body = read_body(&window, &request).await;
    window.clear_timeout_with_handle(timer);
    drop(abort);

    let text = match body {
        Ok(text) => text,
        Err(_) if signal.aborted() => return Err(FetchError::Timeout),
        Err(e) => return Err(e),
    };
    serde_json::from_str(&text).map_err(|e| FetchError::Decode(e.to_string()))
}

async fn read_body(
    window: &web_sys::Window,
    request: &web_sys::Request,
) -> Result<String, FetchError> {
    let value = JsFuture::from(window.fetch_with_request(request))
        .await
        .map_err(network)?;
    let resp: web_sys::Response = value
        .dyn_into()
        .map_err(|_| FetchError::Network("fetch did not return a Response".into()))?;
    if !resp.ok() {
        return Err(FetchError::Http(resp.status()));
    }
    let text = JsFuture::from(resp.text().map_err(network)?)
        .await
        .map_err(network)?;
    text.as_string()
        .ok_or_else(|| FetchError::Decode("response body is not text".into()))
}

fn network(e: JsValue) -> FetchError {
    FetchError::Network(format!("{e:?}"))
}
