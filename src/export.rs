use crate::App;

pub const SKETCH_FILE_NAME: &str = "sketch.ino";

impl App {
    #[cfg(not(target_arch = "wasm32"))]
    pub fn export_sketch(&self) -> Result<(), Box<dyn std::error::Error>> {
        use std::fs;

        let Some(path) = rfd::FileDialog::new()
            .add_filter("Arduino sketch", &["ino"])
            .set_file_name(SKETCH_FILE_NAME)
            .save_file()
        else {
            return Ok(());
        };

        fs::write(&path, self.sketch())?;
        log::info!("Exported sketch to: {}", path.display());
        Ok(())
    }

    #[cfg(target_arch = "wasm32")]
    pub fn export_sketch(&self) -> Result<(), Box<dyn std::error::Error>> {
        use wasm_bindgen::JsCast as _;
        use web_sys::{Blob, BlobPropertyBag, Url, window};

        let code = self.sketch();

        let Some(window) = window() else {
            return Ok(());
        };
        let document = window.document().ok_or("No document")?;

        let blob_parts = js_sys::Array::new();
        blob_parts.push(&wasm_bindgen::JsValue::from_str(&code));

        let options = BlobPropertyBag::new();
        options.set_type("text/plain");

        let blob = Blob::new_with_str_sequence_and_options(&blob_parts, &options)
            .map_err(|_err| "Could not create blob")?;
        let url = Url::create_object_url_with_blob(&blob).map_err(|_err| "Could not create url")?;
        let anchor = document
            .create_element("a")
            .map_err(|_err| "Could not create anchor")?
            .dyn_into::<web_sys::HtmlElement>()
            .map_err(|_err| "Anchor is not an HtmlElement")?;

        anchor.set_attribute("href", &url).ok();
        anchor.set_attribute("download", SKETCH_FILE_NAME).ok();
        anchor.click();
        Url::revoke_object_url(&url).ok();
        log::info!("Sketch exported as download");
        Ok(())
    }
}
