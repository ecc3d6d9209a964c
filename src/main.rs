use std::{env, fs::read_to_string, path::PathBuf, process, rc::Rc, time::Instant};

use beaver::{compiler::compiler::compile, display_error, lexer::lexer::tokenize};
use inkwell::context::Context;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: beaver <source file> [output file]");
        process::exit(2);
    }

    let file_path = PathBuf::from(&args[1]);
    let output_path = args
        .get(2)
        .map(PathBuf::from)
        .unwrap_or_else(|| file_path.with_extension("ll"));
    let file_name = file_path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| args[1].clone());

    let file_contents = match read_to_string(&file_path) {
        Ok(contents) => contents,
        Err(error) => {
            eprintln!("Failed to read {}: {}", file_path.display(), error);
            process::exit(1);
        }
    };

    let start = Instant::now();

    let tokens = match tokenize(file_contents.clone(), Some(file_name.clone())) {
        Ok(tokens) => tokens,
        Err(error) => {
            display_error(&error, &file_contents, &file_path);
            process::exit(1);
        }
    };

    println!("Tokenized in {:?}", start.elapsed());

    let context = Context::create();
    let compile_start = Instant::now();
    let (compiler, errors) = compile(tokens, Rc::new(file_name), &context);

    println!("Compiled in {:?}", compile_start.elapsed());

    for error in errors.iter() {
        display_error(error, &file_contents, &file_path);
    }

    if let Err(error) = compiler.save_module_to_file(&output_path) {
        display_error(&error, &file_contents, &file_path);
        process::exit(1);
    }

    println!("Wrote {}", output_path.display());

    let evaluate_start = Instant::now();
    match compiler.evaluate_top_level() {
        Ok(results) => {
            for (name, value) in results {
                println!("{} evaluated to {}", name, value);
            }
        }
        Err(error) => {
            display_error(&error, &file_contents, &file_path);
            process::exit(1);
        }
    }

    println!("Evaluated in {:?}", evaluate_start.elapsed());
    println!("Total time: {:?}", start.elapsed());

    if !errors.is_empty() {
        process::exit(1);
    }
}
