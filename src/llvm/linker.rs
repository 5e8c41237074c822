//! Module linking.

use inkwell::module::Module;

use crate::core::error::{BindingError, BindingResult};

/// What happens to the source module of a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkerMode {
    /// The source is consumed by the link.
    DestroySource,
    /// A copy of the source is linked; the original is handed back.
    PreserveSource,
}

/// Link `src` into `dest`.
///
/// With [`LinkerMode::PreserveSource`] the untouched source is returned;
/// with [`LinkerMode::DestroySource`] it is consumed and `None` comes back.
/// Symbol conflicts surface LLVM's message as [`BindingError::Link`].
pub fn link_modules<'ctx>(
    dest: &Module<'ctx>,
    src: Module<'ctx>,
    mode: LinkerMode,
) -> BindingResult<Option<Module<'ctx>>> {
    log::debug!("linking {:?} into {:?} ({:?})", src.get_name(), dest.get_name(), mode);
    let link = |module: Module<'ctx>| {
        dest.link_in_module(module).map_err(|message| BindingError::Link {
            message: message.to_string_lossy().into_owned(),
        })
    };
    match mode {
        LinkerMode::DestroySource => {
            link(src)?;
            Ok(None)
        }
        LinkerMode::PreserveSource => {
            link(src.clone())?;
            Ok(Some(src))
        }
    }
}
