// file: src/modes/controller.rs
// description: menu state machine driving the interactive, benchmark and batch modes
// reference: line-oriented console loop over generic reader and writer

use crate::config::Config;
use crate::error::{PipelineError, Result};
use crate::index::{IndexBuilder, IndexStatus, IndexStore, VectorIndex, compute_fingerprint};
use crate::ingest::{PdfScanner, ScannedFile};
use crate::llm::{Embedder, Generator, is_installed};
use crate::models::{Answer, ModelConfig};
use crate::modes::is_exit_word;
use crate::pipeline::{AnswerGenerator, Retriever};
use crate::utils::logging::{format_error, format_heading, format_info, format_success, format_warning};
use std::io::{BufRead, Write};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    MainMenu,
    InteractiveQuery,
    Benchmark,
    BatchTest,
    Exit,
}

impl MenuState {
    pub fn from_choice(choice: &str) -> Option<Self> {
        match choice.trim() {
            "1" => Some(Self::InteractiveQuery),
            "2" => Some(Self::Benchmark),
            "3" => Some(Self::BatchTest),
            "4" => Some(Self::Exit),
            _ => None,
        }
    }
}

pub struct ModeController<R, W> {
    pub(super) config: Config,
    pub(super) embedder: Arc<dyn Embedder>,
    pub(super) generator: Arc<dyn Generator>,
    pub(super) index: Option<VectorIndex>,
    /// Last question asked in any mode, repeated by an empty benchmark line.
    pub(super) last_question: Option<String>,
    pub(super) show_progress: bool,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ModeController<R, W> {
    pub fn new(
        config: Config,
        embedder: Arc<dyn Embedder>,
        generator: Arc<dyn Generator>,
        input: R,
        output: W,
    ) -> Self {
        Self {
            config,
            embedder,
            generator,
            index: None,
            last_question: None,
            show_progress: true,
            input,
            output,
        }
    }

    /// Keeps progress bars off the terminal.
    pub fn quiet(mut self) -> Self {
        self.show_progress = false;
        self
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut state = MenuState::MainMenu;

        while state != MenuState::Exit {
            state = self.step(state).await?;
        }

        self.say(format_info("Goodbye!"))?;
        Ok(())
    }

    /// Runs one state and returns the next one. Recoverable errors are
    /// reported and lead back to the main menu.
    pub async fn step(&mut self, state: MenuState) -> Result<MenuState> {
        debug!("Entering state {:?}", state);

        let outcome = match state {
            MenuState::MainMenu => return self.main_menu(),
            MenuState::Exit => return Ok(MenuState::Exit),
            MenuState::InteractiveQuery => self.run_interactive().await,
            MenuState::Benchmark => self.run_benchmark().await,
            MenuState::BatchTest => self.run_batch().await,
        };

        match outcome {
            Ok(()) => Ok(MenuState::MainMenu),
            Err(e) if e.is_recoverable() => {
                warn!("{:?} ended with error: {}", state, e);
                self.say(format_error(&e.to_string()))?;
                Ok(MenuState::MainMenu)
            }
            Err(e) => Err(e),
        }
    }

    fn main_menu(&mut self) -> Result<MenuState> {
        let rule = "=".repeat(50);
        self.say(format!("\n{}", rule))?;
        self.say(format_heading(&format!("{:^50}", "LLM MODEL COMPARISON SYSTEM")))?;
        self.say(&rule)?;
        self.say("\nSelect an operating mode:")?;
        self.say("1. Normal mode (single model)")?;
        self.say("2. Comparative benchmark (all models)")?;
        self.say("3. Test battery (question file)")?;
        self.say("4. Exit")?;

        let Some(choice) = self.prompt("\nOption: ")? else {
            return Ok(MenuState::Exit);
        };

        match MenuState::from_choice(&choice) {
            Some(next) => Ok(next),
            None => {
                self.say(format_warning("Invalid option!"))?;
                Ok(MenuState::MainMenu)
            }
        }
    }

    pub(super) fn say(&mut self, line: impl AsRef<str>) -> Result<()> {
        writeln!(self.output, "{}", line.as_ref())?;
        Ok(())
    }

    /// Returns the trimmed line, or `None` once the input is exhausted.
    pub(super) fn prompt(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    pub(super) fn confirm(&mut self, question: &str) -> Result<bool> {
        let answer = self.prompt(&format!("{} [y/N]: ", question))?;
        Ok(matches!(
            answer.as_deref().map(str::to_lowercase).as_deref(),
            Some("y" | "yes" | "s" | "sim")
        ))
    }

    /// Lists the configured models and reads a choice until an installed one
    /// is picked. `None` means the user backed out.
    pub(super) async fn select_model(&mut self) -> Result<Option<ModelConfig>> {
        let installed = self.generator.installed_models().await?;
        debug!("Installed models: {:?}", installed);

        let models = self.config.models.clone();
        loop {
            self.say("\nAvailable LLM models:")?;
            for (i, model) in models.iter().enumerate() {
                self.say(format!("{}. {:<10} - {}", i + 1, model.key, model.description))?;
            }

            let Some(choice) = self.prompt(&format!("\nChoose a model (1-{}): ", models.len()))?
            else {
                return Ok(None);
            };
            if is_exit_word(&choice) {
                return Ok(None);
            }

            let Ok(number) = choice.parse::<usize>() else {
                self.say(format_warning("Please type a number only!"))?;
                continue;
            };

            let Some(model) = number.checked_sub(1).and_then(|i| models.get(i)) else {
                self.say(format_warning("Invalid option!"))?;
                continue;
            };

            if is_installed(&installed, &model.model) {
                info!("Selected model {}", model.key);
                return Ok(Some(model.clone()));
            }

            self.say(format_error(&format!(
                "Model '{}' not found. Install it with: ollama pull {}",
                model.model, model.model
            )))?;
        }
    }

    /// Makes sure an index matching the current PDF folder is loaded,
    /// rebuilding a stale one and offering to build a missing one. The folder
    /// is rescanned on every call, so an index held in memory is dropped as
    /// soon as the PDFs change.
    pub(super) async fn ensure_index(&mut self) -> Result<bool> {
        let files = PdfScanner::new().scan_directory(&self.config.documents.pdf_dir)?;
        let fingerprint = compute_fingerprint(
            &files,
            &self.config.chunking,
            self.embedder.model_name(),
        );

        if let Some(index) = &self.index {
            if index.manifest().fingerprint == fingerprint {
                return Ok(true);
            }
            info!("Documents changed, dropping the index held in memory");
            self.index = None;
        }

        let store = IndexStore::new(&self.config.documents.index_dir);

        match store.status(&fingerprint).await? {
            IndexStatus::Current => {
                self.say(format_info("Loading existing index..."))?;
                match store.load().await {
                    Ok(index) => self.index = Some(index),
                    Err(e) => {
                        warn!("Stored index could not be loaded, rebuilding: {}", e);
                        self.say(format_warning(
                            "Stored index is damaged; rebuilding it",
                        ))?;
                        self.build_index(&files, &store).await?;
                    }
                }
            }
            IndexStatus::Stale { stored_fingerprint } => {
                warn!(
                    "Index fingerprint {} does not match {}, rebuilding",
                    stored_fingerprint, fingerprint
                );
                self.say(format_warning(
                    "Documents changed since the index was built; rebuilding it",
                ))?;
                self.build_index(&files, &store).await?;
            }
            IndexStatus::Missing => {
                let missing = PipelineError::IndexNotFound {
                    path: store.dir().to_path_buf(),
                };
                self.say(format_warning(&missing.to_string()))?;
                if !self.confirm("Build the index now?")? {
                    return Ok(false);
                }
                self.build_index(&files, &store).await?;
            }
        }

        Ok(true)
    }

    async fn build_index(&mut self, files: &[ScannedFile], store: &IndexStore) -> Result<()> {
        self.say(format_info(&format!(
            "Loading and processing {} PDF file(s) from {}...",
            files.len(),
            self.config.documents.pdf_dir.display()
        )))?;

        let outcome = {
            let mut builder = IndexBuilder::new(&self.config, self.embedder.as_ref());
            if !self.show_progress {
                builder = builder.quiet();
            }
            builder.build(files).await?
        };
        store.save(&outcome.index).await?;

        for skipped in &outcome.skipped {
            self.say(format_warning(&format!(
                "Skipped {}: {}",
                skipped.relative_path, skipped.reason
            )))?;
        }
        debug!(
            "{} ({:.1} files/s)",
            outcome.embedding_metrics.format(),
            outcome.stats.items_per_second()
        );
        self.say(format_success(&format!(
            "Indexed {} chunks from {} file(s), {:.1} KB of PDF, in {:.1}s ({:.0}% of files read)",
            outcome.index.len(),
            outcome.stats.items_processed,
            outcome.stats.kilobytes_processed(),
            outcome.stats.duration_secs,
            outcome.stats.success_rate()
        )))?;

        self.index = Some(outcome.index);
        Ok(())
    }

    /// Retrieval then generation for one question. Control models skip the
    /// index entirely.
    pub(super) async fn ask(&self, model: &ModelConfig, question: &str) -> Result<Answer> {
        let answers = AnswerGenerator::new(self.generator.as_ref(), &self.config.ollama);

        if !model.use_documents {
            return answers
                .answer(model, question, Vec::new(), Default::default())
                .await;
        }

        let index = self
            .index
            .as_ref()
            .ok_or_else(|| PipelineError::IndexNotFound {
                path: self.config.documents.index_dir.clone(),
            })?;
        let retrieval = Retriever::new(self.embedder.as_ref(), index, self.config.retrieval.top_k)
            .retrieve(question)
            .await?;

        answers
            .answer(model, question, retrieval.chunks, retrieval.elapsed)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{HashEmbedder, ScriptedGenerator, write_pdf};
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        config: Config,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let pdf_dir = dir.path().join("docs");
        std::fs::create_dir_all(&pdf_dir).unwrap();
        write_pdf(
            &pdf_dir.join("wifi7.pdf"),
            &[&["Multi-link operation aggregates links", "Channels reach 320 MHz"]],
        );

        let mut config = Config::default_config();
        config.documents.pdf_dir = pdf_dir;
        config.documents.index_dir = dir.path().join("index");
        config.reports.output_dir = dir.path().join("reports");
        config.chunking.chunk_size = 80;
        config.chunking.chunk_overlap = 20;
        Fixture { _dir: dir, config }
    }

    fn controller(
        config: Config,
        generator: ScriptedGenerator,
        input: &str,
    ) -> ModeController<&[u8], Vec<u8>> {
        ModeController::new(
            config,
            Arc::new(HashEmbedder::new()),
            Arc::new(generator),
            input.as_bytes(),
            Vec::new(),
        )
        .quiet()
    }

    fn printed<R>(controller: &ModeController<R, Vec<u8>>) -> String {
        String::from_utf8_lossy(&controller.output).to_string()
    }

    #[test]
    fn test_menu_choices() {
        assert_eq!(MenuState::from_choice("1"), Some(MenuState::InteractiveQuery));
        assert_eq!(MenuState::from_choice(" 2 "), Some(MenuState::Benchmark));
        assert_eq!(MenuState::from_choice("3"), Some(MenuState::BatchTest));
        assert_eq!(MenuState::from_choice("4"), Some(MenuState::Exit));
        assert_eq!(MenuState::from_choice("5"), None);
        assert_eq!(MenuState::from_choice("abc"), None);
    }

    #[tokio::test]
    async fn test_invalid_option_stays_in_menu() {
        let fx = fixture();
        let mut controller = controller(fx.config, ScriptedGenerator::new(&[]), "9\n");

        let next = controller.step(MenuState::MainMenu).await.unwrap();
        assert_eq!(next, MenuState::MainMenu);
        assert!(printed(&controller).contains("Invalid option!"));

        let next = controller.step(MenuState::MainMenu).await.unwrap();
        assert_eq!(next, MenuState::Exit);
    }

    #[tokio::test]
    async fn test_select_model_reprompts() {
        colored::control::set_override(false);
        let fx = fixture();
        let mut controller = controller(
            fx.config,
            ScriptedGenerator::new(&["llama2"]),
            "abc\n7\n1\n2\n",
        );

        let model = controller.select_model().await.unwrap().unwrap();
        assert_eq!(model.key, "llama2");

        let output = printed(&controller);
        assert!(output.contains("Please type a number only!"));
        assert!(output.contains("Invalid option!"));
        assert!(output.contains("ollama pull mistral"));
    }

    #[tokio::test]
    async fn test_missing_index_declined() {
        let fx = fixture();
        let index_dir = fx.config.documents.index_dir.clone();
        let mut controller = controller(fx.config, ScriptedGenerator::new(&[]), "n\n");

        assert!(!controller.ensure_index().await.unwrap());
        assert!(controller.index.is_none());
        assert!(!index_dir.exists());
    }

    #[tokio::test]
    async fn test_index_built_then_reused_then_rebuilt_when_stale() {
        let fx = fixture();
        let config = fx.config.clone();
        let pdf_dir = config.documents.pdf_dir.clone();

        let mut first = controller(config.clone(), ScriptedGenerator::new(&[]), "y\n");
        assert!(first.ensure_index().await.unwrap());
        let built = first.index.as_ref().unwrap().manifest().clone();

        let mut second = controller(config.clone(), ScriptedGenerator::new(&[]), "");
        assert!(second.ensure_index().await.unwrap());
        assert_eq!(second.index.as_ref().unwrap().manifest(), &built);
        assert!(printed(&second).contains("Loading existing index"));

        write_pdf(&pdf_dir.join("wifi6.pdf"), &[&["OFDMA resource units"]]);
        let mut third = controller(config, ScriptedGenerator::new(&[]), "");
        assert!(third.ensure_index().await.unwrap());
        let rebuilt = third.index.as_ref().unwrap().manifest();
        assert_ne!(rebuilt.fingerprint, built.fingerprint);
        assert_eq!(rebuilt.source_files.len(), 2);
    }

    #[tokio::test]
    async fn test_index_in_memory_dropped_when_pdfs_change() {
        colored::control::set_override(false);
        let fx = fixture();
        let pdf_dir = fx.config.documents.pdf_dir.clone();
        let mut controller = controller(fx.config, ScriptedGenerator::new(&[]), "y\n");

        assert!(controller.ensure_index().await.unwrap());
        let built = controller.index.as_ref().unwrap().manifest().clone();
        assert!(controller.ensure_index().await.unwrap());
        assert_eq!(controller.index.as_ref().unwrap().manifest(), &built);

        write_pdf(&pdf_dir.join("new.pdf"), &[&["Restricted target wake time"]]);
        assert!(controller.ensure_index().await.unwrap());

        let rebuilt = controller.index.as_ref().unwrap().manifest();
        assert_ne!(rebuilt.fingerprint, built.fingerprint);
        assert!(rebuilt.source_files.contains(&"new.pdf".to_string()));
        assert!(printed(&controller).contains("Documents changed since the index was built"));
    }

    #[tokio::test]
    async fn test_damaged_chunks_file_is_rebuilt() {
        colored::control::set_override(false);
        let fx = fixture();
        let config = fx.config.clone();
        let index_dir = config.documents.index_dir.clone();

        let mut first = controller(config.clone(), ScriptedGenerator::new(&[]), "y\n");
        assert!(first.ensure_index().await.unwrap());
        let built = first.index.as_ref().unwrap().len();

        std::fs::write(index_dir.join("chunks.json"), "[{\"chunk\": ").unwrap();

        let mut second = controller(config.clone(), ScriptedGenerator::new(&[]), "");
        assert!(second.ensure_index().await.unwrap());
        assert_eq!(second.index.as_ref().unwrap().len(), built);
        assert!(printed(&second).contains("Stored index is damaged"));

        let reloaded = IndexStore::new(&index_dir).load().await.unwrap();
        assert_eq!(reloaded.len(), built);
    }

    #[tokio::test]
    async fn test_missing_pdf_folder_is_recoverable() {
        let mut fx = fixture();
        fx.config.documents.pdf_dir = fx.config.documents.pdf_dir.join("nope");
        let mut controller = controller(fx.config, ScriptedGenerator::new(&["mistral"]), "1\n");

        let next = controller.step(MenuState::InteractiveQuery).await.unwrap();
        assert_eq!(next, MenuState::MainMenu);
        assert!(printed(&controller).contains("Ingestion error"));
    }
}
