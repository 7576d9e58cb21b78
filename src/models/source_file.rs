use std::path::{Path, PathBuf};

/// PDF 的媒体类型
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// 无法识别类型时使用的媒体类型
pub const OCTET_STREAM_MEDIA_TYPE: &str = "application/octet-stream";

/// 用户选择的一个待处理文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    name: String,
    path: PathBuf,
    media_type: String,
}

impl SourceFile {
    /// 根据路径创建，媒体类型由扩展名推断
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        let media_type = media_type_for(&path).to_string();
        Self {
            name,
            path,
            media_type,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn is_pdf(&self) -> bool {
        self.media_type == PDF_MEDIA_TYPE
    }
}

/// 根据扩展名推断声明的媒体类型
pub fn media_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("pdf") => PDF_MEDIA_TYPE,
        _ => OCTET_STREAM_MEDIA_TYPE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_from_extension() {
        assert!(SourceFile::from_path("papers/A.pdf").is_pdf());
        assert!(SourceFile::from_path("papers/B.PDF").is_pdf());
        assert!(!SourceFile::from_path("notes.txt").is_pdf());
        assert!(!SourceFile::from_path("README").is_pdf());
    }

    #[test]
    fn test_name_is_file_name() {
        let file = SourceFile::from_path("/tmp/papers/A.pdf");
        assert_eq!(file.name(), "A.pdf");
        assert_eq!(file.path(), Path::new("/tmp/papers/A.pdf"));
    }
}
