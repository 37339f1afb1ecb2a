#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod geom;
pub mod grammar;
pub mod parse;

use std::fmt;

use geom::{
    BicubicPatch, GeomMesh, ShapeInstanceExport, Tolerance, Topology, mesh_patches, surfaces,
    tessellate, weld_mesh,
};
use grammar::{EvaluationOptions, EvaluationStats, Grammar, Interpreter};
use serde::Serialize;
use wasm_bindgen::JsError;
use wasm_bindgen::prelude::*;

cfg_if::cfg_if! {
    if #[cfg(all(feature = "console_error_panic_hook", target_arch = "wasm32"))] {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            console_error_panic_hook::set_once();
            init_logger();
        }
    } else {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            init_logger();
        }
    }
}

#[cfg(feature = "debug_logs")]
fn init_logger() {
    use log::LevelFilter;
    use wasm_bindgen_console_logger::DEFAULT_LOGGER;
    if log::set_logger(&DEFAULT_LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}

#[cfg(not(feature = "debug_logs"))]
fn init_logger() {}

#[cfg(all(feature = "parallel", target_arch = "wasm32"))]
#[wasm_bindgen]
pub async fn initialize_parallel(worker_count: Option<u32>) -> Result<(), JsError> {
    let threads = worker_count
        .map(|count| count.max(1) as usize)
        .or_else(|| {
            std::thread::available_parallelism()
                .map(|value| value.get())
                .ok()
        })
        .unwrap_or(1);

    wasm_bindgen_rayon::init_thread_pool(threads)
        .await
        .map_err(|err| JsError::new(&format!("could not start rayon thread pool: {err}")))
}

#[macro_export]
macro_rules! debug_log {
    ($($t:tt)*) => {{
        #[cfg(feature = "debug_logs")]
        {
            #[cfg(target_arch = "wasm32")]
            {
                ::web_sys::console::log_1(&::wasm_bindgen::JsValue::from_str(&format!($($t)*)));
            }
            #[cfg(not(target_arch = "wasm32"))]
            {
                println!("{}", format!($($t)*));
            }
        }
    }};
}

/// Flat mesh buffers handed to JavaScript.
#[derive(Debug, Serialize)]
struct MeshExport {
    positions: Vec<f64>,
    indices: Vec<u32>,
    vertex_count: usize,
    triangle_count: usize,
}

impl From<&GeomMesh> for MeshExport {
    fn from(mesh: &GeomMesh) -> Self {
        Self {
            positions: mesh.positions_flat(),
            indices: mesh.indices_flat(),
            vertex_count: mesh.vertex_count(),
            triangle_count: mesh.triangle_count(),
        }
    }
}

#[derive(Debug, Serialize)]
struct EvaluationExport {
    instances: Vec<ShapeInstanceExport>,
    frames_processed: usize,
    frames_dropped: usize,
}

impl EvaluationExport {
    fn new(instances: &[geom::ShapeInstance], stats: EvaluationStats) -> Self {
        Self {
            instances: instances.iter().map(ShapeInstanceExport::from).collect(),
            frames_processed: stats.frames_processed,
            frames_dropped: stats.frames_dropped,
        }
    }
}

/// Public entry point for consumers.
#[wasm_bindgen]
pub struct Engine {
    grammar: Option<Grammar>,
    patches: Vec<BicubicPatch>,
    weld: bool,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl Engine {
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new() -> Engine {
        Engine {
            grammar: None,
            patches: Vec::new(),
            weld: false,
        }
    }

    /// Weld coincident vertices of every mesh returned afterwards.
    #[wasm_bindgen]
    pub fn set_weld(&mut self, weld: bool) {
        self.weld = weld;
    }

    /// Load a grammar document, or a built-in one by name
    /// (`tree`, `octopod`, `nouveau`).
    #[wasm_bindgen]
    pub fn load_grammar(&mut self, xml_or_name: &str) -> Result<(), JsValue> {
        let source = grammar::library::get(xml_or_name.trim()).unwrap_or(xml_or_name);
        let loaded = Grammar::from_xml(source).map_err(to_js_error)?;
        debug_log!("grammar loaded: {} variants", loaded.variants().len());
        self.grammar = Some(loaded);
        Ok(())
    }

    /// Evaluate the loaded grammar with `seed`.
    #[wasm_bindgen]
    pub fn evaluate_loaded(&self, seed: u32) -> Result<JsValue, JsValue> {
        let Some(loaded) = self.grammar.as_ref() else {
            return Err(js_error("no grammar has been loaded"));
        };
        run_grammar(loaded, seed)
    }

    /// Parse `xml` and evaluate it once with `seed`.
    #[wasm_bindgen]
    pub fn evaluate_grammar(&self, xml: &str, seed: u32) -> Result<JsValue, JsValue> {
        let parsed = Grammar::from_xml(xml).map_err(to_js_error)?;
        run_grammar(&parsed, seed)
    }

    /// Tessellate a built-in surface (`torus`, `sphere`, `klein`, `mobius`).
    #[wasm_bindgen]
    pub fn tessellate_surface(
        &self,
        name: &str,
        slices: usize,
        stacks: usize,
        closed: bool,
    ) -> Result<JsValue, JsValue> {
        let Some(surface) = surfaces::by_name(name) else {
            return Err(js_error(&format!("unknown surface `{name}`")));
        };
        let topology = if closed { Topology::Closed } else { Topology::Open };
        let mesh = tessellate(slices, stacks, &surface, topology);
        self.export_mesh(mesh)
    }

    /// Parse a RIB patch file, keep its patches and return their mesh.
    #[wasm_bindgen]
    pub fn load_patches(
        &mut self,
        rib: &str,
        u_segments: usize,
        v_segments: usize,
    ) -> Result<JsValue, JsValue> {
        self.patches = parse::rib::parse_str(rib).map_err(to_js_error)?;
        self.mesh_loaded_patches(u_segments, v_segments)
    }

    /// Re-mesh the patches from the last [`Engine::load_patches`] call.
    #[wasm_bindgen]
    pub fn mesh_loaded_patches(&self, u_segments: usize, v_segments: usize) -> Result<JsValue, JsValue> {
        let mesh = mesh_patches(u_segments, v_segments, &self.patches);
        self.export_mesh(mesh)
    }

    #[wasm_bindgen]
    #[must_use]
    pub fn patch_count(&self) -> usize {
        self.patches.len()
    }
}

impl Engine {
    fn export_mesh(&self, mesh: GeomMesh) -> Result<JsValue, JsValue> {
        let mesh = if self.weld {
            let (welded, merged) = weld_mesh(&mesh, Tolerance::WELD);
            log::debug!("welded {merged} vertices");
            welded
        } else {
            mesh
        };
        serde_wasm_bindgen::to_value(&MeshExport::from(&mesh))
            .map_err(|err| JsError::new(&err.to_string()).into())
    }
}

fn run_grammar(grammar: &Grammar, seed: u32) -> Result<JsValue, JsValue> {
    let evaluation = Interpreter::with_options(grammar, EvaluationOptions::with_seed(u64::from(seed)))
        .run()
        .map_err(to_js_error)?;
    let export = EvaluationExport::new(&evaluation.instances, evaluation.stats);
    serde_wasm_bindgen::to_value(&export).map_err(|err| JsError::new(&err.to_string()).into())
}

fn to_js_error<E: fmt::Display>(error: E) -> JsValue {
    js_error(&error.to_string())
}

fn js_error(message: &str) -> JsValue {
    #[cfg(target_arch = "wasm32")]
    {
        JsError::new(message).into()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
        JsValue::NULL
    }
}

#[cfg(test)]
mod tests {
    use super::{Engine, MeshExport};
    use crate::geom::{Topology, surfaces, tessellate};

    #[test]
    fn mesh_export_flattens_buffers() {
        let mesh = tessellate(3, 4, &surfaces::sphere, Topology::Open);
        let export = MeshExport::from(&mesh);
        assert_eq!(export.positions.len(), export.vertex_count * 3);
        assert_eq!(export.indices.len(), export.triangle_count * 3);
        assert_eq!(export.vertex_count, 16);
    }

    #[test]
    fn engine_starts_empty() {
        let engine = Engine::new();
        assert_eq!(engine.patch_count(), 0);
        assert!(engine.grammar.is_none());
        assert!(!engine.weld);
    }
}
