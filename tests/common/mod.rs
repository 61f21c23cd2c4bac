// file: tests/common/mod.rs
// description: in-process ollama stand-ins and pdf fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use lopdf::content::{Content, Operation};
use lopdf::{Object, Stream, dictionary};
use rag_bench::{Config, Embedder, GenerationRequest, Generator, PipelineError, Result};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

/// Letter frequency vectors: cheap, deterministic and good enough to rank.
pub struct LetterEmbedder {
    pub calls: AtomicUsize,
}

impl LetterEmbedder {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for LetterEmbedder {
    fn model_name(&self) -> &str {
        "letters"
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts
            .iter()
            .map(|text| {
                let mut vector = vec![0.0f32; 26];
                for c in text.to_ascii_lowercase().bytes() {
                    if c.is_ascii_lowercase() {
                        vector[(c - b'a') as usize] += 1.0;
                    }
                }
                vector
            })
            .collect())
    }
}

pub struct EchoGenerator {
    installed: Vec<String>,
    failing: Vec<String>,
    pub requests: Mutex<Vec<GenerationRequest>>,
}

impl EchoGenerator {
    pub fn new(installed: &[&str]) -> Self {
        Self {
            installed: installed.iter().map(|m| format!("{}:latest", m)).collect(),
            failing: Vec::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_on(mut self, model: &str) -> Self {
        self.failing.push(model.to_string());
        self
    }

    pub fn models_asked(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.model.clone())
            .collect()
    }
}

#[async_trait]
impl Generator for EchoGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        if self.failing.contains(&request.model) {
            return Err(PipelineError::model_unavailable(&request.model, "server closed"));
        }
        let question = request.prompt.rsplit("Question: ").next().unwrap_or_default();
        Ok(format!("{} says: {}", request.model, question))
    }

    async fn installed_models(&self) -> Result<Vec<String>> {
        Ok(self.installed.clone())
    }
}

/// Temporary folder holding PDFs, the index, question file and reports.
pub struct Workspace {
    pub dir: TempDir,
    pub config: Config,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let pdf_dir = dir.path().join("base_tcc");
        std::fs::create_dir_all(&pdf_dir).unwrap();

        write_pdf(
            &pdf_dir.join("wifi7.pdf"),
            &[
                &["Wi-Fi 7 adds multi-link operation", "Channels reach 320 MHz"],
                &["4096-QAM raises the peak rate"],
            ],
        );
        write_pdf(
            &pdf_dir.join("wifi6.pdf"),
            &[&["Wi-Fi 6 introduced OFDMA", "Target wake time saves power"]],
        );

        let mut config = Config::default_config();
        config.documents.pdf_dir = pdf_dir;
        config.documents.index_dir = dir.path().join("faiss_index");
        config.reports.output_dir = dir.path().join("reports");
        config.batch.questions_file = dir.path().join("perguntas.csv");
        config.batch.expected_questions = 3;
        config.chunking.chunk_size = 120;
        config.chunking.chunk_overlap = 30;

        Self { dir, config }
    }

    pub fn write_questions(&self, contents: &str) {
        std::fs::write(&self.config.batch.questions_file, contents).unwrap();
    }

    pub fn reports(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = match std::fs::read_dir(&self.config.reports.output_dir) {
            Ok(entries) => entries.map(|e| e.unwrap().path()).collect(),
            Err(_) => Vec::new(),
        };
        paths.sort();
        paths
    }

    pub fn read_report(path: &Path) -> Vec<csv::StringRecord> {
        csv::Reader::from_path(path)
            .unwrap()
            .records()
            .map(|r| r.unwrap())
            .collect()
    }
}

/// Writes a PDF with one Courier line of text per entry on each page.
pub fn write_pdf(path: &Path, pages: &[&[&str]]) {
    let mut doc = lopdf::Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let kids: Vec<Object> = pages
        .iter()
        .map(|lines| {
            let operations: Vec<Operation> = lines
                .iter()
                .enumerate()
                .flat_map(|(i, line)| {
                    vec![
                        Operation::new("BT", vec![]),
                        Operation::new("Tf", vec!["F1".into(), 12.into()]),
                        Operation::new("Td", vec![40.into(), (800 - 16 * i as i64).into()]),
                        Operation::new("Tj", vec![Object::string_literal(*line)]),
                        Operation::new("ET", vec![]),
                    ]
                })
                .collect();
            let content = Content { operations }.encode().unwrap();
            let content_id = doc.add_object(Stream::new(dictionary! {}, content));
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            })
            .into()
        })
        .collect();

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}
