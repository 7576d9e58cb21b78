//! 论文元数据记录
//!
//! 固定的 13 个字符串字段，顺序即规范顺序（schema、TSV 导出、报告共用）。

use serde::{Deserialize, Serialize};

/// 无法确定的字段统一使用的占位值
pub const NOT_AVAILABLE: &str = "Not Available";

/// 记录字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordField {
    Title,
    FullCitation,
    Doi,
    Crop,
    PathogenName,
    PathogenType,
    MicrobiomeType,
    AffectedPlantParts,
    PrimerName,
    DatabaseUsed,
    AnalysisPipeline,
    StatTools,
    SequencingPlatform,
}

impl RecordField {
    /// 规范顺序
    pub const ALL: [RecordField; 13] = [
        RecordField::Title,
        RecordField::FullCitation,
        RecordField::Doi,
        RecordField::Crop,
        RecordField::PathogenName,
        RecordField::PathogenType,
        RecordField::MicrobiomeType,
        RecordField::AffectedPlantParts,
        RecordField::PrimerName,
        RecordField::DatabaseUsed,
        RecordField::AnalysisPipeline,
        RecordField::StatTools,
        RecordField::SequencingPlatform,
    ];

    /// JSON 中的字段名
    pub fn key(self) -> &'static str {
        match self {
            RecordField::Title => "title",
            RecordField::FullCitation => "fullCitation",
            RecordField::Doi => "doi",
            RecordField::Crop => "crop",
            RecordField::PathogenName => "pathogenName",
            RecordField::PathogenType => "pathogenType",
            RecordField::MicrobiomeType => "microbiomeType",
            RecordField::AffectedPlantParts => "affectedPlantParts",
            RecordField::PrimerName => "primerName",
            RecordField::DatabaseUsed => "databaseUsed",
            RecordField::AnalysisPipeline => "analysisPipeline",
            RecordField::StatTools => "statTools",
            RecordField::SequencingPlatform => "sequencingPlatform",
        }
    }

    /// 显示名称
    pub fn label(self) -> &'static str {
        match self {
            RecordField::Title => "Title",
            RecordField::FullCitation => "Full Citation",
            RecordField::Doi => "DOI",
            RecordField::Crop => "Crop",
            RecordField::PathogenName => "Pathogen Name",
            RecordField::PathogenType => "Pathogen Type",
            RecordField::MicrobiomeType => "Microbiome Type",
            RecordField::AffectedPlantParts => "Affected Plant Parts",
            RecordField::PrimerName => "Primer Name",
            RecordField::DatabaseUsed => "Database Used",
            RecordField::AnalysisPipeline => "Analysis Pipeline",
            RecordField::StatTools => "Stat Tools",
            RecordField::SequencingPlatform => "Sequencing Platform",
        }
    }

    /// 发送给模型的字段说明
    pub fn description(self) -> &'static str {
        match self {
            RecordField::Title => "The full title of the research article.",
            RecordField::FullCitation => "The full citation of the article in APA format.",
            RecordField::Doi => "The Digital Object Identifier (DOI) of the article.",
            RecordField::Crop => "The specific crop or plant host studied.",
            RecordField::PathogenName => "The scientific name of the pathogen(s) studied.",
            RecordField::PathogenType => {
                "The type of pathogen (e.g., Fungal, Bacterial, Viral, Nematode)."
            }
            RecordField::MicrobiomeType => {
                "The Microbiome Type (e.g. Root, Soil, Stem) or sample source."
            }
            RecordField::AffectedPlantParts => {
                "The parts of the plant affected (e.g., Leaves, Roots, Stem)."
            }
            RecordField::PrimerName => "Names of specific primers used for PCR/sequencing.",
            RecordField::DatabaseUsed => {
                "Reference databases used (e.g., NCBI GenBank, UNITE, SILVA, Greengenes)."
            }
            RecordField::AnalysisPipeline => {
                "Bioinformatics pipelines or software used for analysis."
            }
            RecordField::StatTools => "Statistical tools or software used (e.g., R, SPSS, SAS).",
            RecordField::SequencingPlatform => {
                "The sequencing platform used (e.g., Illumina MiSeq, Sanger, Nanopore)."
            }
        }
    }
}

/// 从论文中提取出的元数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ExtractedRecord {
    pub title: String,
    pub full_citation: String,
    pub doi: String,
    pub crop: String,
    pub pathogen_name: String,
    pub pathogen_type: String,
    pub microbiome_type: String,
    pub affected_plant_parts: String,
    pub primer_name: String,
    pub database_used: String,
    pub analysis_pipeline: String,
    pub stat_tools: String,
    pub sequencing_platform: String,
}

impl ExtractedRecord {
    /// 所有字段均为占位值的记录
    pub fn not_available() -> Self {
        let na = || NOT_AVAILABLE.to_string();
        Self {
            title: na(),
            full_citation: na(),
            doi: na(),
            crop: na(),
            pathogen_name: na(),
            pathogen_type: na(),
            microbiome_type: na(),
            affected_plant_parts: na(),
            primer_name: na(),
            database_used: na(),
            analysis_pipeline: na(),
            stat_tools: na(),
            sequencing_platform: na(),
        }
    }

    pub fn get(&self, field: RecordField) -> &str {
        match field {
            RecordField::Title => &self.title,
            RecordField::FullCitation => &self.full_citation,
            RecordField::Doi => &self.doi,
            RecordField::Crop => &self.crop,
            RecordField::PathogenName => &self.pathogen_name,
            RecordField::PathogenType => &self.pathogen_type,
            RecordField::MicrobiomeType => &self.microbiome_type,
            RecordField::AffectedPlantParts => &self.affected_plant_parts,
            RecordField::PrimerName => &self.primer_name,
            RecordField::DatabaseUsed => &self.database_used,
            RecordField::AnalysisPipeline => &self.analysis_pipeline,
            RecordField::StatTools => &self.stat_tools,
            RecordField::SequencingPlatform => &self.sequencing_platform,
        }
    }

    fn get_mut(&mut self, field: RecordField) -> &mut String {
        match field {
            RecordField::Title => &mut self.title,
            RecordField::FullCitation => &mut self.full_citation,
            RecordField::Doi => &mut self.doi,
            RecordField::Crop => &mut self.crop,
            RecordField::PathogenName => &mut self.pathogen_name,
            RecordField::PathogenType => &mut self.pathogen_type,
            RecordField::MicrobiomeType => &mut self.microbiome_type,
            RecordField::AffectedPlantParts => &mut self.affected_plant_parts,
            RecordField::PrimerName => &mut self.primer_name,
            RecordField::DatabaseUsed => &mut self.database_used,
            RecordField::AnalysisPipeline => &mut self.analysis_pipeline,
            RecordField::StatTools => &mut self.stat_tools,
            RecordField::SequencingPlatform => &mut self.sequencing_platform,
        }
    }

    /// 设置字段值（构造测试数据或手工修订时使用）
    pub fn with_field(mut self, field: RecordField, value: impl Into<String>) -> Self {
        *self.get_mut(field) = value.into();
        self
    }

    /// 按规范顺序返回 13 个字段值
    pub fn values(&self) -> [&str; 13] {
        RecordField::ALL.map(|field| self.get(field))
    }

    /// 字段是否有实际内容
    pub fn is_available(&self, field: RecordField) -> bool {
        self.get(field) != NOT_AVAILABLE
    }

    /// 空白字段替换为占位值，其余字段去掉首尾空白
    pub fn normalize_sentinels(mut self) -> Self {
        for field in RecordField::ALL {
            let value = self.get_mut(field);
            let trimmed = value.trim();
            if trimmed.is_empty() {
                *value = NOT_AVAILABLE.to_string();
            } else if trimmed.len() != value.len() {
                *value = trimmed.to_string();
            }
        }
        self
    }

    /// 制表符分隔的一行，可直接粘贴进表格
    ///
    /// 字段内的制表符和换行不做转义。
    pub fn to_tsv_row(&self) -> String {
        self.values().join("\t")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> String {
        let mut object = serde_json::Map::new();
        for field in RecordField::ALL {
            object.insert(
                field.key().to_string(),
                serde_json::Value::String(format!("v-{}", field.key())),
            );
        }
        serde_json::Value::Object(object).to_string()
    }

    #[test]
    fn test_keys_match_serde_names() {
        let record: ExtractedRecord = serde_json::from_str(&sample_json()).unwrap();
        for field in RecordField::ALL {
            assert_eq!(record.get(field), format!("v-{}", field.key()));
        }
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let json = r#"{"title": "only a title"}"#;
        assert!(serde_json::from_str::<ExtractedRecord>(json).is_err());
    }

    #[test]
    fn test_non_string_field_is_rejected() {
        let json = sample_json().replace("\"v-doi\"", "42");
        assert!(serde_json::from_str::<ExtractedRecord>(&json).is_err());
    }

    #[test]
    fn test_normalize_blank_fields() {
        let record = ExtractedRecord::not_available()
            .with_field(RecordField::Doi, "  10.1/x ")
            .with_field(RecordField::Crop, "   ")
            .with_field(RecordField::StatTools, "")
            .normalize_sentinels();

        assert_eq!(record.doi, "10.1/x");
        assert_eq!(record.crop, NOT_AVAILABLE);
        assert_eq!(record.stat_tools, NOT_AVAILABLE);
        assert!(record.is_available(RecordField::Doi));
        assert!(!record.is_available(RecordField::Crop));
    }

    #[test]
    fn test_tsv_row_uses_canonical_order() {
        let record = ExtractedRecord::not_available()
            .with_field(RecordField::SequencingPlatform, "Illumina MiSeq")
            .with_field(RecordField::Title, "Root microbiome");

        let row = record.to_tsv_row();
        let cells: Vec<&str> = row.split('\t').collect();

        assert_eq!(cells.len(), 13);
        assert_eq!(cells[0], "Root microbiome");
        assert_eq!(cells[12], "Illumina MiSeq");
        assert!(cells[1..12].iter().all(|c| *c == NOT_AVAILABLE));
    }
}
