//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

#[macro_use]
extern crate clap;
#[macro_use]
extern crate log;

use clap::{App, AppSettings, ArgMatches, SubCommand};
use dem_grid::parse_bbox;
use dem_tiler_core::core::{parse_config, read_config, ApplicationCfg, Config};
use dem_tiler_core::core::config::DEFAULT_CONFIG;
use dem_tiler_service::dem_service::DemService;
use dotenv::dotenv;
use env_logger::Builder;
use log::Record;
use std::env;
use std::io::Write;
use std::process;
use time;

fn init_logger(args: &ArgMatches<'_>) {
    let mut builder = Builder::new();
    builder.format(|buf, record: &Record<'_>| {
        let t = time::now();
        writeln!(
            buf,
            "{}.{:03} {} {}",
            time::strftime("%Y-%m-%d %H:%M:%S", &t).unwrap(),
            t.tm_nsec / 1000_000,
            record.level(),
            record.args()
        )
    });

    let rust_log_env = env::var("RUST_LOG");
    let rust_log = if args.value_of("loglevel").is_none() && rust_log_env.is_ok() {
        rust_log_env.as_ref().unwrap()
    } else {
        match args.value_of("loglevel").unwrap_or("info") {
            "debug" => "debug,tokio=info",
            loglevel => loglevel,
        }
    };
    builder.parse_filters(rust_log);

    builder.init();
}

fn config_from_args(args: &ArgMatches<'_>) -> ApplicationCfg {
    if let Some(cfgpath) = args.value_of("config") {
        info!("Reading configuration from '{}'", cfgpath);
        for argname in vec!["input", "output", "tile-size"] {
            if args.value_of(argname).is_some() {
                warn!("Ignoring argument `{}`", argname);
            }
        }
        read_config(cfgpath).unwrap_or_else(|err| {
            println!("Error reading configuration - {} ", err);
            process::exit(1)
        })
    } else {
        let mut config: ApplicationCfg = parse_config(DEFAULT_CONFIG.to_string(), "").unwrap();
        if let Some(input) = args.value_of("input") {
            config.pipeline.input = input.to_string();
        }
        if let Some(output) = args.value_of("output") {
            config.pipeline.output = output.to_string();
        }
        if let Some(size) = args.value_of("tile-size") {
            config.tileset.tile_size = size
                .parse()
                .expect("Error parsing 'tile-size' as integer value");
        }
        if let Some(minzoom) = args.value_of("minzoom") {
            config.tileset.zoom_min = minzoom
                .parse()
                .expect("Error parsing 'minzoom' as integer value");
        }
        if let Some(maxzoom) = args.value_of("maxzoom") {
            config.tileset.zoom_max = maxzoom
                .parse()
                .expect("Error parsing 'maxzoom' as integer value");
        }
        if let Some(step) = args.value_of("sample-step") {
            config.tileset.sample_step = step
                .parse()
                .expect("Error parsing 'sample-step' as integer value");
        }
        if let Some(no_data) = args.value_of("no-data") {
            config.tileset.no_data = no_data
                .parse()
                .expect("Error parsing 'no-data' as float value");
        }
        config
    }
}

fn generate(args: &ArgMatches<'_>) {
    let config = config_from_args(args);
    let service = DemService::from_config(&config).unwrap_or_else(|err| {
        println!("Error reading configuration - {} ", err);
        process::exit(1)
    });
    let bbox = args.value_of("bbox").map(|s| {
        parse_bbox(s).unwrap_or_else(|err| {
            println!("Error parsing 'bbox' - {}", err);
            process::exit(1)
        })
    });
    let progress = args.value_of("progress").map_or(true, |s| {
        s.parse::<bool>()
            .expect("Error parsing 'progress' as boolean value")
    });
    let overwrite = args.value_of("overwrite").map_or(false, |s| {
        s.parse::<bool>()
            .expect("Error parsing 'overwrite' as boolean value")
    });
    if let Err(err) = service.generate(bbox.as_ref(), progress, overwrite) {
        eprintln!("error: {}", err);
        process::exit(1);
    }
}

fn main() {
    dotenv().ok();
    let mut app = App::new("dem_tiler")
        .version(crate_version!())
        .author("Pirmin Kalberer <pka@sourcepole.ch>")
        .about("DEM pipeline converting elevation rasters into EPSG:4326 tile pyramids")
        .subcommand(
            SubCommand::with_name("generate")
                .setting(AppSettings::AllowLeadingHyphen)
                .args_from_usage(
                    "-c, --config=[FILE] 'Load from custom config file'
                     --loglevel=[error|warn|info|debug|trace] 'Log level (Default: info)'
                     --input=[DIR] 'Input directory with DEM rasters'
                     --output=[DIR] 'Output terrain directory'
                     --bbox=[minLon,minLat,maxLon,maxLat] 'Bounds to tile (EPSG:4326 degrees). If omitted, tiles the full grid extent'
                     --tile-size=[PIXELS] 'Tile size in pixels'
                     --minzoom=[LEVEL] 'Minimum zoom level'
                     --maxzoom=[LEVEL] 'Maximum zoom level'
                     --sample-step=[NUM] 'Vertex sampling step for the viewer'
                     --no-data=[VALUE] 'No-data value'
                     --progress=[true|false] 'Show progress bar'
                     --overwrite=[false|true] 'Overwrite previously generated tiles'",
                )
                .about("Generate tile pyramid and tileset descriptor"),
        )
        .subcommand(
            SubCommand::with_name("genconfig")
                .args_from_usage(
                    "--loglevel=[error|warn|info|debug|trace] 'Log level (Default: info)'",
                )
                .about("Generate configuration template"),
        );

    match app.get_matches_from_safe_borrow(env::args()) {
        //app.get_matches() prohibits later call of app.print_help()
        Result::Err(e) => {
            println!("{}", e);
        }
        Result::Ok(matches) => match matches.subcommand() {
            ("generate", Some(sub_m)) => {
                init_logger(sub_m);
                generate(sub_m);
            }
            ("genconfig", Some(sub_m)) => {
                init_logger(sub_m);
                println!("{}", DemService::gen_config());
            }
            _ => {
                let _ = app.print_help();
                println!("");
            }
        },
    }
}
