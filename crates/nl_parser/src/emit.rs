use swc_common::{comments::Comments, sync::Lrc, SourceMap};
use swc_ecma_codegen::{text_writer::JsWriter, Emitter, Node};

use crate::error::EmitError;

/// Render a module to source text.
///
/// Nodes built by the transform carry dummy spans; the emitter gives them
/// default formatting and keeps everything else close to the input.
pub fn print_module(
    module: &swc_ecma_ast::Module,
    source_map: &Lrc<SourceMap>,
    comments: Option<&dyn Comments>,
) -> Result<String, EmitError> {
    let mut buf = Vec::new();
    {
        let writer = JsWriter::new(source_map.clone(), "\n", &mut buf, None);
        let mut emitter = Emitter {
            cfg: swc_ecma_codegen::Config::default()
                .with_target(swc_ecma_ast::EsVersion::latest()),
            cm: source_map.clone(),
            comments,
            wr: writer,
        };
        module.emit_with(&mut emitter)?;
    }

    Ok(String::from_utf8(buf)?)
}
