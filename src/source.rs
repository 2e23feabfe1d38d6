use crate::Error;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// Where the files of a feed are read from
///
/// For an archive, the zip file is opened on the first lookup and kept open until
/// the source is dropped, so every file of a parse reuses the same handle.
pub enum FeedSource {
    /// A directory holding `agency.txt`, `stops.txt`…
    Directory(PathBuf),
    /// A zip archive holding the same files
    Archive {
        /// Path of the zip file
        path: PathBuf,
        /// The opened archive, `None` until the first file is requested
        archive: Option<zip::ZipArchive<BufReader<File>>>,
    },
}

impl FeedSource {
    /// Guesses the kind of source from the path: directory or zip file
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let p = path.as_ref();
        if p.is_file() {
            Ok(FeedSource::Archive {
                path: p.to_path_buf(),
                archive: None,
            })
        } else if p.is_dir() {
            Ok(FeedSource::Directory(p.to_path_buf()))
        } else {
            Err(Error::NotFileNorDirectory(format!("{}", p.display())))
        }
    }

    /// Opens a file of the feed, `Ok(None)` if the feed does not have it
    pub fn open(&mut self, file_name: &str) -> Result<Option<Box<dyn Read + '_>>, Error> {
        match self {
            FeedSource::Directory(dir) => {
                let path = dir.join(file_name);
                if !path.exists() {
                    return Ok(None);
                }
                let file = File::open(path).map_err(|e| Error::NamedFileIO {
                    file_name: file_name.to_owned(),
                    source: Box::new(e),
                })?;
                Ok(Some(Box::new(file)))
            }
            FeedSource::Archive { path, archive } => {
                if archive.is_none() {
                    log::debug!("opening archive {}", path.display());
                    let reader = BufReader::new(File::open(path.as_path())?);
                    *archive = Some(zip::ZipArchive::new(reader)?);
                }
                let archive = match archive {
                    Some(archive) => archive,
                    None => return Ok(None),
                };
                let entry_name = if archive.file_names().any(|name| name == file_name) {
                    Some(file_name.to_owned())
                } else {
                    // Some producers put the files in a top level folder of the archive
                    archive
                        .file_names()
                        .filter(|name| {
                            Path::new(name).file_name() == Some(std::ffi::OsStr::new(file_name))
                        })
                        .min_by_key(|name| (name.len(), *name))
                        .map(str::to_owned)
                };
                match entry_name {
                    Some(entry_name) => {
                        let entry =
                            archive
                                .by_name(&entry_name)
                                .map_err(|e| Error::NamedFileIO {
                                    file_name: file_name.to_owned(),
                                    source: Box::new(e),
                                })?;
                        Ok(Some(Box::new(entry)))
                    }
                    None => Ok(None),
                }
            }
        }
    }
}
