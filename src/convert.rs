use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::{fs, process::Command};

use crate::{info_time, Error, Result};

const DEFAULT_CONVERTER: &str = "scel2txt";

/// Merges every artifact in `source_dir` into `dest_dir/dest_file_name`.
#[async_trait]
pub trait Converter: Send + Sync {
    async fn convert(
        &self,
        source_dir: &Path,
        dest_dir: &Path,
        dest_file_name: &str,
    ) -> Result<()>;
}

/// Runs an external converter program as `<program> <source_dir> <dest_dir> <dest_file_name>`.
#[derive(Debug, Clone)]
pub struct CommandConverter {
    program: PathBuf,
}

impl CommandConverter {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for CommandConverter {
    fn default() -> Self {
        Self::new(DEFAULT_CONVERTER)
    }
}

#[async_trait]
impl Converter for CommandConverter {
    async fn convert(
        &self,
        source_dir: &Path,
        dest_dir: &Path,
        dest_file_name: &str,
    ) -> Result<()> {
        fs::create_dir_all(dest_dir).await?;
        info_time!(
            "Converting {} into {} with {}",
            source_dir.display(),
            dest_dir.join(dest_file_name).display(),
            self.program.display()
        );

        let status = Command::new(&self.program)
            .arg(source_dir)
            .arg(dest_dir)
            .arg(dest_file_name)
            .status()
            .await?;
        if !status.success() {
            return Err(Error::Converter {
                program: self.program.display().to_string(),
                status,
            });
        }
        Ok(())
    }
}

/// `sogou_dict_<YYMMDD>.dict.yaml`
pub fn handoff_file_name(date: NaiveDate) -> String {
    format!("sogou_dict_{}.dict.yaml", date.format("%y%m%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_uses_two_digit_year() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(handoff_file_name(date), "sogou_dict_240305.dict.yaml");

        let date = NaiveDate::from_ymd_opt(2009, 12, 31).unwrap();
        assert_eq!(handoff_file_name(date), "sogou_dict_091231.dict.yaml");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_program_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let converter = CommandConverter::new("false");
        let err = converter
            .convert(tmp.path(), &tmp.path().join("dict"), "x.dict.yaml")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Converter { ref program, .. } if program == "false"));
        assert!(tmp.path().join("dict").is_dir());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn missing_program_is_an_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let converter = CommandConverter::new(tmp.path().join("no-such-converter"));
        let err = converter
            .convert(tmp.path(), tmp.path(), "x.dict.yaml")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
