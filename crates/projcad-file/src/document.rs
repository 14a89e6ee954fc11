//! 请求与图纸文档
//!
//! 两种 JSON 文档：
//! - [`RequestDocument`]：一条待处理的请求
//! - [`ArtifactDocument`]：请求、所用配置及生成结果，可交给外部渲染器

use crate::error::{FileError, Result};
use crate::grammar::parse_request;
use chrono::{DateTime, Utc};
use projcad_core::emitter::Artifact;
use projcad_core::layout::DrawingConfig;
use projcad_core::request::CanonicalRequest;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};
use uuid::Uuid;

/// 当前文档格式版本
pub const FORMAT_VERSION: u32 = 1;

/// 文档元数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// 文档唯一标识
    pub id: Uuid,

    /// 标题，通常是题目的简述
    pub title: String,

    /// 创建时间
    pub created_at: DateTime<Utc>,

    /// 文件格式版本
    pub format_version: u32,

    /// 长度单位
    pub units: String,

    /// 生成程序及版本
    pub generator: String,
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            title: "Untitled".to_string(),
            created_at: Utc::now(),
            format_version: FORMAT_VERSION,
            units: "mm".to_string(),
            generator: concat!("projcad ", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl DocumentMetadata {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    fn check_version(&self) -> Result<()> {
        if self.format_version > FORMAT_VERSION {
            return Err(FileError::UnsupportedVersion(self.format_version));
        }
        Ok(())
    }
}

/// 请求文档
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestDocument {
    pub metadata: DocumentMetadata,
    pub request: CanonicalRequest,
}

impl RequestDocument {
    pub fn new(request: CanonicalRequest) -> Self {
        Self {
            metadata: DocumentMetadata::titled(request.entity_kind.as_str()),
            request,
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let document: Self = serde_json::from_str(&text)?;
        document.metadata.check_version()?;
        Ok(document)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        write_json(path, self)?;
        info!(path = %path.display(), id = %self.metadata.id, "request document saved");
        Ok(())
    }
}

/// 图纸文档
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactDocument {
    pub metadata: DocumentMetadata,
    pub request: CanonicalRequest,
    pub config: DrawingConfig,
    pub artifact: Artifact,
}

impl ArtifactDocument {
    pub fn new(request: CanonicalRequest, config: DrawingConfig, artifact: Artifact) -> Self {
        let title = match &artifact {
            Artifact::Drawing(d) => d.subject.clone(),
            Artifact::Diagnostic(d) => format!("unsupported {}", d.variant.name),
        };
        Self {
            metadata: DocumentMetadata {
                units: config.display_unit.symbol().to_string(),
                ..DocumentMetadata::titled(title)
            },
            request,
            config,
            artifact,
        }
    }

    /// 生成并打包
    pub fn generate(request: CanonicalRequest, config: DrawingConfig) -> Result<Self> {
        let artifact = projcad_core::generate(&request, &config)?;
        Ok(Self::new(request, config, artifact))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let document: Self = serde_json::from_str(&text)?;
        document.metadata.check_version()?;
        Ok(document)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        write_json(path, self)?;
        info!(
            path = %path.display(),
            id = %self.metadata.id,
            diagnostic = self.artifact.is_diagnostic(),
            "artifact document saved"
        );
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// 从文件读取请求
///
/// `.json` 文件可以是 [`RequestDocument`] 或裸的 [`CanonicalRequest`]；
/// 其他扩展名按请求语法解析。
pub fn load_request(path: impl AsRef<Path>) -> Result<CanonicalRequest> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    debug!(path = %path.display(), bytes = text.len(), "loading request");

    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => parse_request_json(&text),
        _ => Ok(parse_request(&text)?),
    }
}

/// 解析 JSON 形式的请求
pub fn parse_request_json(text: &str) -> Result<CanonicalRequest> {
    match serde_json::from_str::<RequestDocument>(text) {
        Ok(document) => {
            document.metadata.check_version()?;
            Ok(document.request)
        }
        Err(document_err) => serde_json::from_str::<CanonicalRequest>(text).map_err(|_| {
            FileError::InvalidFormat(format!("not a request document: {document_err}"))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use projcad_core::request::EntityKind;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("projcad-{}-{name}", Uuid::new_v4()))
    }

    fn prism_request() -> CanonicalRequest {
        CanonicalRequest::new("solid")
            .with("solid_type", "prism")
            .with("sizes", vec![5.0, 30.0, 80.0])
    }

    #[test]
    fn test_request_document_roundtrip() {
        let path = temp_path("request.json");
        let document = RequestDocument::new(prism_request());
        document.save(&path).expect("Failed to save");

        let loaded = RequestDocument::load(&path).expect("Failed to load");
        assert_eq!(loaded, document);
        assert_eq!(loaded.metadata.title, "solid");

        assert_eq!(load_request(&path).unwrap(), prism_request());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_bare_request_json() {
        let request = parse_request_json(
            r#"{"entity_kind": "line", "attributes": {"true_length": 80, "angle_to_hp": 30}}"#,
        )
        .unwrap();
        assert_eq!(request.entity_kind, EntityKind::Line);
        assert!(matches!(
            parse_request_json(r#"{"nope": 1}"#),
            Err(FileError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_grammar_file() {
        let path = temp_path("request.txt");
        std::fs::write(&path, "kind=point\ninfront=20\nabove=30\n").unwrap();
        let request = load_request(&path).unwrap();
        assert_eq!(request.entity_kind, EntityKind::Point);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_artifact_document_roundtrip() {
        let path = temp_path("artifact.json");
        let document =
            ArtifactDocument::generate(prism_request(), DrawingConfig::default()).unwrap();
        assert!(document.artifact.as_drawing().is_some());
        document.save(&path).unwrap();

        let loaded = ArtifactDocument::load(&path).unwrap();
        assert_eq!(loaded.metadata, document.metadata);
        assert_eq!(loaded.request, document.request);
        let (a, b) = (
            loaded.artifact.as_drawing().unwrap(),
            document.artifact.as_drawing().unwrap(),
        );
        assert_eq!(a.primitive_count(), b.primitive_count());
        assert_eq!(a.subject, b.subject);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_diagnostic_document_title() {
        let request = CanonicalRequest::new("lamina").with("shape", "rhombus");
        let document = ArtifactDocument::generate(request, DrawingConfig::default()).unwrap();
        assert!(document.artifact.is_diagnostic());
        assert_eq!(document.metadata.title, "unsupported rhombus");
    }

    #[test]
    fn test_newer_version_rejected() {
        let mut document = RequestDocument::new(prism_request());
        document.metadata.format_version = FORMAT_VERSION + 1;
        let json = serde_json::to_string(&document).unwrap();
        assert!(matches!(
            parse_request_json(&json),
            Err(FileError::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn test_validation_error_propagates() {
        let request = CanonicalRequest::new("line").with("true_length", -1.0);
        assert!(matches!(
            ArtifactDocument::generate(request, DrawingConfig::default()),
            Err(FileError::Core(_))
        ));
    }
}
