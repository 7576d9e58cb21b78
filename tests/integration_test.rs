use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use research_extract::error::{ExtractResult, ExtractionError};
use research_extract::models::{
    select_paths, ExtractionStatus, RecordField, SourceFile, FAILED_MESSAGE, NOT_AVAILABLE,
};
use research_extract::services::extraction_service::{parse_record, InlineDocument};
use research_extract::services::tsv_export;
use research_extract::{
    App, BatchOrchestrator, Config, DocumentExtractor, EncodedDocument, ExtractedRecord,
    ResultStore,
};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// 按文件内容决定行为的提取器
///
/// - `fail`：返回错误
/// - `sleep:<毫秒>:<剩余内容>`：先等待再按剩余内容处理
/// - 其他：作为模型输出的 JSON 文本解析
struct ScriptedExtractor;

fn decode_content(document: &EncodedDocument) -> ExtractResult<String> {
    let inline = InlineDocument::from_data_uri(document.as_data_uri())?;
    let bytes = STANDARD
        .decode(inline.data.as_bytes())
        .map_err(|e| ExtractionError::InvalidDocument {
            reason: e.to_string(),
        })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[async_trait]
impl DocumentExtractor for ScriptedExtractor {
    async fn extract(&self, document: &EncodedDocument) -> ExtractResult<ExtractedRecord> {
        let decoded = decode_content(document)?;
        let mut content = decoded.as_str();

        if let Some(rest) = content.strip_prefix("sleep:") {
            let (millis, rest) = rest.split_once(':').unwrap_or((rest, ""));
            let millis: u64 = millis.parse().unwrap_or(0);
            tokio::time::sleep(Duration::from_millis(millis)).await;
            content = rest;
        }

        if content == "fail" {
            return Err(ExtractionError::EmptyResponse {
                model: "scripted".to_string(),
            });
        }

        parse_record(content)
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// 13 个字段的 JSON，未指定的字段为 "Not Available"
fn record_json(overrides: &[(RecordField, &str)]) -> String {
    let fields: Vec<String> = RecordField::ALL
        .iter()
        .map(|field| {
            let value = overrides
                .iter()
                .find(|(f, _)| f == field)
                .map(|(_, v)| *v)
                .unwrap_or(NOT_AVAILABLE);
            format!("\"{}\": {}", field.key(), serde_json::json!(value))
        })
        .collect();
    format!("{{{}}}", fields.join(", "))
}

fn write_file(dir: &TempDir, name: &str, content: &str) -> SourceFile {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    SourceFile::from_path(path)
}

fn test_app(dir: &TempDir) -> App {
    let config = Config {
        max_concurrent_files: 4,
        output_tsv_file: dir.path().join("out.tsv").to_string_lossy().into_owned(),
        ..Config::default()
    };
    App::with_extractor(config, Arc::new(ScriptedExtractor))
}

#[tokio::test]
async fn test_success_and_failure_in_one_batch() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);
    let files = vec![
        write_file(&dir, "A.pdf", &record_json(&[(RecordField::Doi, "10.1/x")])),
        write_file(&dir, "B.pdf", "fail"),
    ];

    let summary = app.process(files).await;
    assert_eq!(summary.total, 2);
    assert_eq!(summary.success, 1);
    assert_eq!(summary.failed, 1);

    let results = app.store().snapshot();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].file_name(), "A.pdf");
    assert_eq!(results[0].status(), ExtractionStatus::Success);
    let data = results[0].data().unwrap();
    assert_eq!(data.get(RecordField::Doi), "10.1/x");
    assert_eq!(data.get(RecordField::Title), NOT_AVAILABLE);

    assert_eq!(results[1].file_name(), "B.pdf");
    assert_eq!(results[1].status(), ExtractionStatus::Error);
    assert_eq!(results[1].error_message(), Some(FAILED_MESSAGE));
    assert!(results[1].data().is_none());

    let line = app.copy_line(1).unwrap();
    let columns: Vec<&str> = line.split('\t').collect();
    assert_eq!(columns.len(), 13);
    assert_eq!(columns[2], "10.1/x");
    assert!(app.copy_line(2).is_none());
    assert!(app.copy_line(3).is_none());
    assert!(!app.is_processing());
}

#[tokio::test]
async fn test_loading_entries_inserted_in_order_before_older_results() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(ResultStore::new());
    let orchestrator = BatchOrchestrator::new(Arc::new(ScriptedExtractor), store.clone(), 0);

    let first = orchestrator.submit(vec![write_file(&dir, "old.pdf", &record_json(&[]))]);
    first.wait().await;

    let slow = format!("sleep:100:{}", record_json(&[]));
    let handle = orchestrator.submit(vec![
        write_file(&dir, "C.pdf", &slow),
        write_file(&dir, "D.pdf", &slow),
        write_file(&dir, "E.pdf", &slow),
    ]);

    // submit 返回时整批占位条目已可见，排在旧结果之前
    let snapshot = store.snapshot();
    let names: Vec<&str> = snapshot.iter().map(|r| r.file_name()).collect();
    assert_eq!(names, vec!["C.pdf", "D.pdf", "E.pdf", "old.pdf"]);
    assert!(snapshot[..3]
        .iter()
        .all(|r| r.status() == ExtractionStatus::Loading));
    assert!(orchestrator.is_processing());

    handle.wait().await;
    let names: Vec<String> = store
        .snapshot()
        .iter()
        .map(|r| r.file_name().to_string())
        .collect();
    assert_eq!(names, vec!["C.pdf", "D.pdf", "E.pdf", "old.pdf"]);
    assert!(!orchestrator.is_processing());
}

#[tokio::test]
async fn test_failures_do_not_affect_other_files() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);
    let ok = record_json(&[(RecordField::Crop, "Wheat")]);
    let files = vec![
        write_file(&dir, "1.pdf", "fail"),
        write_file(&dir, "2.pdf", &format!("sleep:50:{}", ok)),
        write_file(&dir, "3.pdf", "{ not json"),
        write_file(&dir, "4.pdf", &ok),
    ];

    let summary = app.process(files).await;
    assert_eq!(summary.success, 2);
    assert_eq!(summary.failed, 2);

    let statuses: Vec<ExtractionStatus> =
        app.store().snapshot().iter().map(|r| r.status()).collect();
    assert_eq!(
        statuses,
        vec![
            ExtractionStatus::Error,
            ExtractionStatus::Success,
            ExtractionStatus::Error,
            ExtractionStatus::Success,
        ]
    );

    // 每条结果要么有数据要么有错误信息，二者互斥
    for result in app.store().snapshot() {
        assert!(result.data().is_some() != result.error_message().is_some());
    }
}

#[tokio::test]
async fn test_blank_and_extra_fields() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let blank = record_json(&[(RecordField::Title, "  "), (RecordField::Doi, "10.2/y")]);
    let extra = blank.replacen('{', "{\"journal\": \"Nature\", ", 1);
    let files = vec![
        write_file(&dir, "blank.pdf", &format!("```json\n{}\n```", blank)),
        write_file(&dir, "extra.pdf", &extra),
    ];

    app.process(files).await;
    let results = app.store().snapshot();

    let data = results[0].data().unwrap();
    assert_eq!(data.get(RecordField::Title), NOT_AVAILABLE);
    assert_eq!(data.get(RecordField::Doi), "10.2/y");

    assert_eq!(results[1].status(), ExtractionStatus::Error);
}

#[tokio::test]
async fn test_export_uses_store_order_and_skips_failures() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    app.process(vec![write_file(
        &dir,
        "first.pdf",
        &record_json(&[(RecordField::Title, "First")]),
    )])
    .await;
    app.process(vec![
        write_file(&dir, "second.pdf", &record_json(&[(RecordField::Title, "Second")])),
        write_file(&dir, "broken.pdf", "fail"),
    ])
    .await;

    let rows = app.export(None).await.unwrap();
    assert_eq!(rows, 2);

    let text = std::fs::read_to_string(&app.config().output_tsv_file).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], tsv_export::header_line());
    assert!(lines[1].starts_with("Second\t"));
    assert!(lines[2].starts_with("First\t"));
}

#[tokio::test]
async fn test_clear_discards_late_updates() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    assert!(!app.clear_results(false));

    let store = app.store().clone();
    let slow = format!("sleep:100:{}", record_json(&[]));
    let files = vec![write_file(&dir, "late.pdf", &slow)];

    let process = app.process(files);
    let clear = async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(store.len(), 1);
        assert!(app.clear_results(true));
    };
    let (summary, _) = tokio::join!(process, clear);

    assert_eq!(summary.success, 1);
    assert!(store.is_empty());
    assert_eq!(app.report(), "Extracted Data (0)\n");
}

#[tokio::test]
async fn test_non_pdf_files_are_ignored() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);
    let pdf = write_file(&dir, "paper.pdf", &record_json(&[]));
    let txt = write_file(&dir, "notes.txt", "hello");

    let selection = select_paths(vec![pdf.path().to_path_buf(), txt.path().to_path_buf()]);
    assert_eq!(selection.accepted.len(), 1);
    assert_eq!(selection.rejected.len(), 1);
    assert!(selection.notice().is_some());

    let summary = app.process_selection(selection).await.unwrap();
    assert_eq!(summary.total, 1);
    let results = app.store().snapshot();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].file_name(), "paper.pdf");

    let only_txt = select_paths(vec![txt.path().to_path_buf()]);
    assert!(app.process_selection(only_txt).await.is_none());
    assert_eq!(app.store().len(), 1);
}

#[tokio::test]
async fn test_run_scans_input_folder_and_exports() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input_pdf");
    std::fs::create_dir(&input).unwrap();
    std::fs::write(
        input.join("a.pdf"),
        record_json(&[(RecordField::Doi, "10.3/z")]),
    )
    .unwrap();
    std::fs::write(input.join("readme.md"), "ignored").unwrap();

    let config = Config {
        input_folder: input.to_string_lossy().into_owned(),
        output_tsv_file: dir.path().join("run.tsv").to_string_lossy().into_owned(),
        ..Config::default()
    };
    let app = App::with_extractor(config, Arc::new(ScriptedExtractor));
    tokio_test::assert_ok!(app.run(Vec::new()).await);

    assert_eq!(app.store().len(), 1);
    let text = std::fs::read_to_string(dir.path().join("run.tsv")).unwrap();
    assert!(text.contains("10.3/z"));
}

#[tokio::test]
async fn test_submit_selection_returns_while_files_are_loading() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);
    let slow = format!("sleep:100:{}", record_json(&[]));
    let pdf = write_file(&dir, "slow.pdf", &slow);

    let handle = app
        .submit_selection(select_paths(vec![pdf.path().to_path_buf()]))
        .unwrap();

    // 提交后立即可见 loading 条目，控制台可以在批次进行中 list / clear
    assert!(app.report().contains("(loading)"));
    assert!(app.status_line().contains("⏳ 1 进行中"));
    assert!(app.is_processing());

    assert!(app.clear_results(true));
    let summary = handle.wait().await;

    assert_eq!(summary.success, 1);
    assert!(app.store().is_empty());
    assert!(!app.is_processing());
}

#[tokio::test]
#[ignore] // 默认忽略，需要手动运行：GEMINI_API_KEY=... SAMPLE_PDF=... cargo test -- --ignored
async fn test_extract_real_pdf() {
    research_extract::utils::logging::init(true);

    let config = Config::load().expect("加载配置失败");
    let path = std::env::var("SAMPLE_PDF").expect("需要设置 SAMPLE_PDF");

    let app = App::initialize(config).expect("初始化失败");
    let summary = app.process(vec![SourceFile::from_path(path)]).await;

    assert_eq!(summary.success, 1, "真实 PDF 应该提取成功");
    println!("{}", app.report());
}
