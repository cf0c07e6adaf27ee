// Copyright (c) 2026 Light VerSec contributors
//
// The Universal Permissive License (UPL), Version 1.0
//
// Subject to the condition set forth below, permission is hereby granted to any person obtaining a
// copy of this software, associated documentation and/or data (collectively the "Software"), free
// of charge and under any and all copyright rights in the Software, and any and all patent rights
// owned or freely licensable by each licensor hereunder covering either (i) the unmodified
// Software as contributed to or provided by such licensor, or (ii) the Larger Works (as defined
// below), to deal in both
//
// (a) the Software, and
// (b) any piece of software and/or hardware listed in the lrgrwrks.txt file
// if one is included with the Software (each a "Larger Work" to which the Software is contributed
// by such licensors),
//
// without restriction, including without limitation the rights to copy, create derivative works
// of, display, perform, and distribute the Software and make, use, sell, offer for sale, import,
// export, have made, and have sold the Software and the Larger Work(s), and to sublicense the
// foregoing rights on either these or other terms.
//
// This license is subject to the following condition: The above copyright notice and either this
// complete permission notice or at a minimum a reference to the UPL must be included in all copies
// or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING
// BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
// DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! `lvsc`: compile Light VerSec schemas and query compiled models from
//! the command line.

use std::env;
use std::fs;
use std::path::Path;
use std::process;

use getopts::Options;
use log::error;

use lvs_model::{codec, Name};
use lvs_runtime::{check, match_name, suggest};

fn main() {
    env_logger::init();
    let args: Vec<String> = env::args().collect();
    let prog = args[0].clone();

    if args.len() < 2 {
        print_usage(&prog);
        process::exit(2);
    }

    let result = match args[1].as_str() {
        "compile" => cmd_compile(&args[2..]),
        "match" => cmd_match(&args[2..]),
        "check" => cmd_check(&args[2..]),
        "suggest" => cmd_suggest(&args[2..]),
        "-h" | "--help" => {
            print_usage(&prog);
            return;
        }
        other => Err(format!("unknown subcommand '{}'", other))
    };

    if let Err(msg) = result {
        error!("{}", msg);
        eprintln!("lvsc: {}", msg);
        process::exit(1);
    }
}

fn print_usage(prog: &str) {
    eprintln!(
        "usage:\n  \
         {prog} compile <schema.lvs> -o <model.lvsb>\n  \
         {prog} match <model.lvsb> <name>\n  \
         {prog} check <model.lvsb> <pktName> <keyName>\n  \
         {prog} suggest <model.lvsb> <pktName> <key>...",
        prog = prog
    );
}

fn cmd_compile(argv: &[String]) -> Result<(), String> {
    let mut opts = Options::new();
    opts.optopt("o", "output", "path to write the compiled .lvsb model to", "FILE");
    let matches = opts.parse(argv).map_err(|e| e.to_string())?;
    let schema_path = matches.free.first().ok_or("compile requires a schema path")?;

    let source = fs::read_to_string(schema_path).map_err(|e| format!("reading {}: {}", schema_path, e))?;
    let model = lvs_model::compile(&source).map_err(|e| format!("{}: {}", schema_path, e))?;
    let bytes = codec::encode(&model);

    let out_path = matches.opt_str("o").unwrap_or_else(|| default_output_path(schema_path));
    fs::write(&out_path, &bytes).map_err(|e| format!("writing {}: {}", out_path, e))?;
    println!("{} -> {} ({} nodes, {} bytes)", schema_path, out_path, model.nodes.len(), bytes.len());
    Ok(())
}

fn default_output_path(schema_path: &str) -> String {
    let stem = Path::new(schema_path).file_stem().and_then(|s| s.to_str()).unwrap_or("model");
    format!("{}.lvsb", stem)
}

fn load_model(path: &str) -> Result<lvs_model::Model, String> {
    let bytes = fs::read(path).map_err(|e| format!("reading {}: {}", path, e))?;
    codec::decode(&bytes).map_err(|e| format!("{}: {}", path, e))
}

fn cmd_match(argv: &[String]) -> Result<(), String> {
    if argv.len() != 2 {
        return Err("match requires <model.lvsb> <name>".to_string());
    }
    let model = load_model(&argv[0])?;
    let name = Name::from_uri(&argv[1]);
    let matches = match_name(&model, &name, &());
    if matches.is_empty() {
        println!("no match");
    } else {
        for m in &matches {
            println!("node {}", m.node_id);
        }
    }
    Ok(())
}

fn cmd_check(argv: &[String]) -> Result<(), String> {
    if argv.len() != 3 {
        return Err("check requires <model.lvsb> <pktName> <keyName>".to_string());
    }
    let model = load_model(&argv[0])?;
    let pkt = Name::from_uri(&argv[1]);
    let key = Name::from_uri(&argv[2]);
    let ok = check(&model, &pkt, &key, &());
    println!("{}", ok);
    if !ok {
        process::exit(1);
    }
    Ok(())
}

fn cmd_suggest(argv: &[String]) -> Result<(), String> {
    if argv.len() < 2 {
        return Err("suggest requires <model.lvsb> <pktName> <key>...".to_string());
    }
    let model = load_model(&argv[0])?;
    let pkt = Name::from_uri(&argv[1]);
    let inventory: Vec<Name> = argv[2..].iter().map(|s| Name::from_uri(s)).collect();
    match suggest(&model, &pkt, inventory.iter(), &()) {
        Some(key) => {
            println!("{}", key);
            Ok(())
        }
        None => {
            println!("none");
            process::exit(1);
        }
    }
}
