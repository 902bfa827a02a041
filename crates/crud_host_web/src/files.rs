//! Registry of browser `File` objects chosen in upload fields.
//!
//! Form state only carries [`FileUpload`] metadata. The `File` itself stays here, keyed by the
//! upload handle, until the multipart body is assembled.

#[cfg(target_arch = "wasm32")]
use std::{cell::RefCell, collections::HashMap};

use crud_contract::FileUpload;

#[cfg(target_arch = "wasm32")]
thread_local! {
    static FILES: RefCell<HashMap<u64, web_sys::File>> = RefCell::new(HashMap::new());
}

/// Registers a chosen file and returns its metadata.
pub fn register_file(file: &web_sys::File) -> Option<FileUpload> {
    #[cfg(target_arch = "wasm32")]
    {
        let upload = FileUpload {
            file_name: file.name(),
            mime_type: file.type_(),
            size_bytes: file.size().max(0.0) as u64,
            handle: crud_host::next_monotonic_id(),
        };
        FILES.with(|files| files.borrow_mut().insert(upload.handle, file.clone()));
        Some(upload)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = file;
        None
    }
}

/// Registers every file currently selected in `input`.
pub fn register_input_files(input: &web_sys::HtmlInputElement) -> Vec<FileUpload> {
    #[cfg(target_arch = "wasm32")]
    {
        let Some(list) = input.files() else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|index| list.get(index))
            .filter_map(|file| register_file(&file))
            .collect()
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = input;
        Vec::new()
    }
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn lookup_file(handle: u64) -> Option<web_sys::File> {
    FILES.with(|files| files.borrow().get(&handle).cloned())
}

/// Drops the `File` behind `handle` (after a successful save or when the modal closes).
pub fn release_file(handle: u64) {
    #[cfg(target_arch = "wasm32")]
    {
        FILES.with(|files| {
            files.borrow_mut().remove(&handle);
        });
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = handle;
    }
}
