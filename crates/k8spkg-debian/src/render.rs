//! Rendering a package source tree into a staging directory

use std::fs;
use std::path::{Path, PathBuf};

use k8spkg_core::{Error, Result};
use tracing::debug;
use walkdir::WalkDir;

use crate::helpers::HelperRegistry;
use crate::template::{Template, TemplateContext};

/// A parsed file waiting to be written
struct RenderWork {
    src: PathBuf,
    dst: PathBuf,
    template: Template,
    permissions: fs::Permissions,
}

/// Renders every file of a source tree as a template
#[derive(Debug, Clone, Copy)]
pub struct TreeRenderer<'a> {
    helpers: &'a HelperRegistry,
}

impl<'a> TreeRenderer<'a> {
    pub fn new(helpers: &'a HelperRegistry) -> Self {
        Self { helpers }
    }

    /// Mirror `src` into the existing directory `dst`, rendering each file.
    ///
    /// `src` may be a symlink to a tree shared between distros. Directory
    /// and file permissions are copied from the source. Every file is
    /// parsed before any is written. Returns the number of rendered files.
    pub fn render_tree(&self, src: &Path, dst: &Path, context: &TemplateContext) -> Result<usize> {
        let real_src = fs::canonicalize(src).map_err(|e| Error::filesystem(src, e))?;
        debug!("Rendering {} into {}", real_src.display(), dst.display());

        let mut work = Vec::new();

        for entry in WalkDir::new(&real_src).follow_links(true).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| real_src.clone());
                Error::filesystem(path, e.into())
            })?;

            let relative = entry
                .path()
                .strip_prefix(&real_src)
                .map_err(|e| Error::template(entry.path().display().to_string(), e))?;
            if relative.as_os_str().is_empty() {
                continue;
            }

            let dst_path = dst.join(relative);
            let metadata = entry
                .metadata()
                .map_err(|e| Error::filesystem(entry.path(), e.into()))?;

            if metadata.is_dir() {
                debug!("{}", dst_path.display());
                fs::create_dir(&dst_path).map_err(|e| Error::filesystem(&dst_path, e))?;
                fs::set_permissions(&dst_path, metadata.permissions())
                    .map_err(|e| Error::filesystem(&dst_path, e))?;
                continue;
            }

            let source = fs::read_to_string(entry.path()).map_err(|e| match e.kind() {
                std::io::ErrorKind::InvalidData => {
                    Error::template(entry.path().display().to_string(), "file is not valid UTF-8")
                }
                _ => Error::filesystem(entry.path(), e),
            })?;
            let template = Template::parse(&source)
                .map_err(|e| Error::template(entry.path().display().to_string(), e))?;

            work.push(RenderWork {
                src: entry.path().to_path_buf(),
                dst: dst_path,
                template,
                permissions: metadata.permissions(),
            });
        }

        for item in &work {
            debug!("Rendering {} -> {}", item.src.display(), item.dst.display());

            let rendered = item
                .template
                .render(context, self.helpers)
                .map_err(|e| Error::template(item.src.display().to_string(), e))?;

            fs::write(&item.dst, rendered).map_err(|e| Error::filesystem(&item.dst, e))?;
            fs::set_permissions(&item.dst, item.permissions.clone())
                .map_err(|e| Error::filesystem(&item.dst, e))?;
        }

        Ok(work.len())
    }
}
