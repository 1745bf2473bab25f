use rein_batch::window::{FrameInput, FrameOutput, Window, WindowSettings};
use rein_batch::{
    BackendConfig, BatchRenderBackend, BlendMode, FileResourceLoader, Image, Quad, TexRect,
    WgpuDevice,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const ATLAS_SIZE: u32 = 512;
const CHECKER_SIZE: u32 = 64;
/// Corner of the atlas holding plain white, sampled by untextured quads.
const WHITE_TEXEL: (u32, u32) = (ATLAS_SIZE - 2, ATLAS_SIZE - 2);

struct Demo {
    backend: Option<BatchRenderBackend<WgpuDevice>>,
}

fn checkerboard(size: u32, cell: u32) -> anyhow::Result<Image> {
    let mut pixels = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let light = ((x / cell) + (y / cell)) % 2 == 0;
            let v = if light { 0xe0 } else { 0x40 };
            pixels.extend_from_slice(&[v, v, v, 0xff]);
        }
    }
    Ok(Image::from_rgba(size, size, pixels)?)
}

fn init(input: &FrameInput<'_>) -> anyhow::Result<BatchRenderBackend<WgpuDevice>> {
    let device = WgpuDevice::new(input.ctx, input.format())?;
    let mut backend = BatchRenderBackend::new(device, BackendConfig::from_env())?;
    backend.set_resource_loader(Box::new(FileResourceLoader::with_roots(["assets", "."])));
    backend.set_cursor_sink(Box::new(input.cursor.clone()));

    backend.create_atlas_texture(ATLAS_SIZE, ATLAS_SIZE);
    backend.add_image_to_texture(&checkerboard(CHECKER_SIZE, 8)?, 0, 0);
    backend.add_image_to_texture(
        &Image::from_rgba(2, 2, vec![0xff; 16])?,
        WHITE_TEXEL.0,
        WHITE_TEXEL.1,
    );

    // missing files come back empty and are skipped
    let logo = backend.load_image("logo.png");
    backend.add_image_to_texture(&logo, CHECKER_SIZE, 0);

    match backend.create_mouse_cursor("cursor.png", 0, 0) {
        Ok(cursor) => backend.enable_mouse_cursor(&cursor),
        Err(err) => tracing::info!("using the default cursor: {}", err),
    }

    Ok(backend)
}

fn frame(demo: &mut Demo, input: FrameInput<'_>) -> FrameOutput {
    if demo.backend.is_none() {
        match init(&input) {
            Ok(backend) => demo.backend = Some(backend),
            Err(err) => {
                tracing::error!("failed to set up the batch renderer: {:#}", err);
                return FrameOutput::exit();
            }
        }
    }
    let Some(backend) = demo.backend.as_mut() else {
        return FrameOutput::exit();
    };

    backend
        .device_mut()
        .set_target(input.surface_view.clone(), input.width(), input.height());

    backend.begin_frame();
    backend.clear();

    let (width, height) = (backend.width() as f32, backend.height() as f32);
    let t = input.elapsed_time as f32;

    let white = TexRect::from_pixels(WHITE_TEXEL.0, WHITE_TEXEL.1, 1, 1, (ATLAS_SIZE, ATLAS_SIZE));

    backend.begin_batch(BlendMode::Normal);
    backend.add_quad(
        Quad::new(0.0, 0.0, width, height)
            .with_vertical_gradient([0.10, 0.12, 0.20, 1.0], [0.02, 0.02, 0.05, 1.0])
            .with_texture(white),
    );

    // a grid of tiles, enough to spill over into several batches
    let checker = TexRect::from_pixels(0, 0, CHECKER_SIZE, CHECKER_SIZE, (ATLAS_SIZE, ATLAS_SIZE));
    let columns = (width / 12.0) as usize;
    let rows = (height / 12.0) as usize;
    for row in 0..rows {
        for column in 0..columns {
            let phase = (row + column) as f32 * 0.1 + t;
            let alpha = 0.25 + 0.25 * phase.sin();
            backend.add_quad(
                Quad::new(column as f32 * 12.0, row as f32 * 12.0, 10.0, 10.0)
                    .with_color([1.0, 1.0, 1.0, alpha])
                    .with_texture(checker),
            );
        }
    }

    backend.begin_batch(BlendMode::Multiply);
    let (mx, my) = input.mouse_position;
    backend.add_quad(
        Quad::new(mx - 64.0, my - 64.0, 128.0, 128.0)
            .with_horizontal_gradient([1.0, 0.6, 0.6, 1.0], [0.6, 0.6, 1.0, 1.0])
            .with_texture(white),
    );

    let batches = backend.render();
    tracing::trace!("{} batches, {} pooled", batches, backend.pooled_batches());
    backend.end_frame();

    FrameOutput::new()
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,wgpu_core=warn,wgpu_hal=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let window = Window::new(
        WindowSettings::new()
            .title("rein-batch demo")
            .size(1024, 768)
            .min_size(320, 240),
    )?;

    window.render_loop(
        Demo { backend: None },
        frame,
    )
}
