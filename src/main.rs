use lancer::cli_options;
use lancer::config::{read_config, Config};
use lancer::image;
use lancer::renderer;
use radiometry::color::Color;
use scene::{loader, preset, Albedo, Material};
use std::path::Path;
use std::time::Instant;

fn main() {
    env_logger::init();
    let options = match cli_options::parse_args(std::env::args().collect()) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{}\nusage: {}", message, cli_options::CliOptions::message());
            std::process::exit(1);
        }
    };

    let config = match &options.config_file {
        None => Config::default(),
        Some(file) => read_config(Path::new(file)).unwrap_or_else(|err| {
            eprintln!("{}", err);
            std::process::exit(1);
        }),
    }
    .or_defaults()
    .unwrap_or_else(|err| {
        eprintln!("{}", err);
        std::process::exit(1);
    });
    log::info!("rendering with {:?}", config);

    let mut builder = preset::builder();
    if let Some(obj_file) = &options.obj_file {
        let mut mesh = loader::load_obj(Path::new(obj_file)).unwrap_or_else(|err| {
            eprintln!("{}", err);
            std::process::exit(1);
        });
        preset::pose_mesh(&mut mesh);
        builder.add_mesh(mesh, Material::matte(Albedo::Constant(Color::new(0.9, 0.05, 0.05))));
    }
    let scene = builder.build().unwrap_or_else(|err| {
        eprintln!("{}", err);
        std::process::exit(1);
    });
    log::info!("{}", scene.summary());

    let start = Instant::now();
    let pixels = if options.use_multi_thread {
        renderer::render(&scene, &config)
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(1)
            .build()
            .expect("single-thread pool");
        pool.install(|| renderer::render(&scene, &config))
    };
    let elapsed = start.elapsed();
    let ray_count =
        config.width as u64 * config.height as u64 * config.rays_per_pixel as u64;
    log::info!(
        "rendered {} rays in {:.1}s ({:.2}us per ray)",
        ray_count,
        elapsed.as_secs_f64(),
        elapsed.as_micros() as f64 / ray_count as f64
    );

    let resolution = (config.width as u32, config.height as u32);
    if let Err(err) = image::write_png(Path::new(&options.output), &pixels, resolution) {
        eprintln!("can't write {}: {}", options.output, err);
        std::process::exit(1);
    }
    println!("wrote {}", options.output);
}
