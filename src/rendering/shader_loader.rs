use std::{
    path::{Path, PathBuf},
    sync::{
        mpsc::{channel, Receiver},
        Arc, RwLock,
    },
    time::Duration,
};

use anyhow::Context;
use id_arena::{Arena, Id};
use naga::{
    back::wgsl::WriterFlags,
    valid::{Capabilities, ValidationFlags},
};
use naga_oil::compose::{
    ComposableModuleDescriptor, Composer, NagaModuleDescriptor, ShaderLanguage,
};
use notify_debouncer_mini::{
    new_debouncer_opt, notify::RecommendedWatcher, notify::RecursiveMode, DebounceEventResult,
    DebouncedEventKind, Debouncer,
};
use pollster::block_on;
use wgpu::PollType;

const SHADER_FOLDER: &str = "assets/shaders";
const SHARED_MODULES_FOLDER: &str = "assets/shaders/shared";

pub type PipelineFactory = Box<
    dyn Sync
        + Send
        + Fn(&wgpu::Device, &ShaderDefinition, &str) -> anyhow::Result<wgpu::RenderPipeline>,
>;

#[derive(Debug, Clone)]
pub struct ShaderDefinition {
    pub name: &'static str,
    /// Relative to the shader folder.
    pub path: &'static str,
}

struct ShaderEntry {
    pipeline_id: PipelineId,
    def: ShaderDefinition,
    factory: PipelineFactory,
}

pub type PipelineId = Id<PipelineSlot>;

#[derive(Default)]
pub struct PipelineSlot(Option<wgpu::RenderPipeline>);

/// Collects shaders while passes are being created; `ShaderLoader::new`
/// compiles them all.
#[derive(Default)]
pub struct PipelineCacheBuilder {
    shaders: Vec<ShaderEntry>,
    pipelines: Arena<PipelineSlot>,
}

impl PipelineCacheBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_shader(&mut self, def: ShaderDefinition, factory: PipelineFactory) -> PipelineId {
        let pipeline_id = self.pipelines.alloc(PipelineSlot::default());
        self.shaders.push(ShaderEntry {
            pipeline_id,
            def,
            factory,
        });
        pipeline_id
    }
}

pub struct PipelineCache {
    pipelines: Arena<PipelineSlot>,
}

impl PipelineCache {
    pub fn get(&self, id: PipelineId) -> Option<&wgpu::RenderPipeline> {
        self.pipelines.get(id).and_then(|slot| slot.0.as_ref())
    }

    fn set(&mut self, id: PipelineId, pipeline: wgpu::RenderPipeline) {
        if let Some(slot) = self.pipelines.get_mut(id) {
            slot.0 = Some(pipeline);
        }
    }
}

type CompiledPipeline = (&'static str, PipelineId, wgpu::RenderPipeline);

// Compiles every registered shader up front, then optionally watches the
// shader folder and recompiles edited files on the debouncer thread.
pub struct ShaderLoader {
    pub cache: PipelineCache,
    receiver: Option<Receiver<CompiledPipeline>>,
    _debouncer: Option<Debouncer<RecommendedWatcher>>,
}

impl ShaderLoader {
    pub fn new(
        device: &wgpu::Device,
        builder: PipelineCacheBuilder,
        watch: bool,
    ) -> anyhow::Result<Self> {
        let PipelineCacheBuilder { shaders, pipelines } = builder;
        let mut cache = PipelineCache { pipelines };

        let composer = Arc::new(RwLock::new(create_composer(Path::new(SHARED_MODULES_FOLDER))?));

        for shader in &shaders {
            let pipeline = compile_file(device, &shader.def, &shader.factory, &composer)
                .with_context(|| format!("Failed to compile shader: {}", shader.def.name))?;
            cache.set(shader.pipeline_id, pipeline);
            log::debug!("Compiled shader {}", shader.def.name);
        }

        if !watch {
            return Ok(Self {
                cache,
                receiver: None,
                _debouncer: None,
            });
        }

        let (sender, receiver) = channel();
        let device = device.clone();
        let shaders = Arc::new(shaders);

        let mut debouncer = new_debouncer_opt(
            notify_debouncer_mini::Config::default().with_timeout(Duration::from_millis(100)),
            move |res: DebounceEventResult| {
                let events = match res {
                    Ok(events) => events,
                    Err(e) => {
                        log::warn!("Error watching shaders: {}", e);
                        return;
                    }
                };

                for event in events {
                    if event.kind != DebouncedEventKind::Any {
                        continue;
                    }

                    for entry in shaders
                        .iter()
                        .filter(|entry| event.path.ends_with(entry.def.path))
                    {
                        match compile_file(&device, &entry.def, &entry.factory, &composer) {
                            Ok(pipeline) => {
                                let _ = sender.send((entry.def.name, entry.pipeline_id, pipeline));
                            }
                            Err(e) => log::error!("Failed to reload shader {}: {:#}", entry.def.name, e),
                        }
                    }
                }
            },
        )
        .context("Failed to create shader watcher")?;

        let shader_folder: PathBuf = Path::new(SHADER_FOLDER)
            .canonicalize()
            .context("Shader folder not found")?;
        debouncer
            .watcher()
            .watch(&shader_folder, RecursiveMode::Recursive)
            .context("Failed to watch shader folder")?;

        Ok(Self {
            cache,
            receiver: Some(receiver),
            _debouncer: Some(debouncer),
        })
    }

    pub fn load_pending_shaders(&mut self) {
        let Some(receiver) = &self.receiver else {
            return;
        };

        while let Ok((name, pipeline_id, pipeline)) = receiver.try_recv() {
            log::info!("Shader reloaded: {}", name);
            self.cache.set(pipeline_id, pipeline);
        }
    }
}

fn compile_file(
    device: &wgpu::Device,
    shader_def: &ShaderDefinition,
    factory: &PipelineFactory,
    composer: &RwLock<Composer>,
) -> anyhow::Result<wgpu::RenderPipeline> {
    let path = Path::new(SHADER_FOLDER).join(shader_def.path);
    let source = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read shader file {}", path.display()))?;
    let file_path = path.to_string_lossy().to_string();

    let module = {
        let mut composer = composer
            .write()
            .map_err(|_| anyhow::anyhow!("Shader composer lock poisoned"))?;

        composer
            .make_naga_module(NagaModuleDescriptor {
                file_path: &file_path,
                source: &source,
                ..Default::default()
            })
            .context("Failed to create Naga module from shader code")?
    };

    // wgpu validates again when the module is created, this pass is only for the WGSL writer.
    let info = naga::valid::Validator::new(ValidationFlags::empty(), Capabilities::all())
        .validate(&module)
        .context("Failed to validate Naga module")?;

    let composed = naga::back::wgsl::write_string(&module, &info, WriterFlags::empty())
        .context("Failed to write composed shader as WGSL")?;

    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let pipeline = factory(device, shader_def, &composed);
    device
        .poll(PollType::Wait)
        .context("Failed to poll device after shader compilation")?;

    if let Some(error) = block_on(device.pop_error_scope()) {
        anyhow::bail!("Pipeline creation failed for {}: {}", shader_def.name, error);
    }

    pipeline
}

fn create_composer(shared_folder: &Path) -> anyhow::Result<Composer> {
    let mut composer = Composer::default();

    let entries = std::fs::read_dir(shared_folder).with_context(|| {
        format!(
            "Failed to read shared shader modules in {}",
            shared_folder.display()
        )
    })?;

    for entry in entries {
        let path = entry?.path();
        if !path.is_file() || path.extension().map_or(true, |ext| ext != "wgsl") {
            continue;
        }

        let source = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read shared shader module {}", path.display()))?;
        let file_path = path.to_string_lossy().to_string();

        composer
            .add_composable_module(ComposableModuleDescriptor {
                source: &source,
                file_path: &file_path,
                language: ShaderLanguage::Wgsl,
                ..Default::default()
            })
            .with_context(|| format!("Failed to add shared shader module: {}", file_path))?;
    }

    Ok(composer)
}
