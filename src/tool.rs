#[macro_use]
extern crate clap;
extern crate indexmap;
extern crate spag;

use clap::App;
use indexmap::IndexMap;
use spag::parser;
use spag::scanner::Scanner;
use spag::table::ParseTable;

fn main() {
    let _matches = App::new(crate_name!())
        .version(crate_version!())
        .author(crate_authors!())
        .about("Compiles scanner and parser specifications into tables")
        .get_matches();

    // Compile a small demonstration scanner.
    let mut expressions = IndexMap::new();
    expressions.insert("INT".to_string(), "[0-9]+".to_string());
    expressions.insert("ID".to_string(), "[a-z][a-z0-9]*".to_string());
    expressions.insert("WS".to_string(), "[ \\t\\n]+".to_string());
    let scanner = Scanner::compile("demo", expressions).expect("demo scanner must compile");
    println!("{}", scanner);

    // Compile a small demonstration grammar.
    let grammar =
        parser::parse_grammar("demo", "S", "S : a S b | ;").expect("demo grammar must compile");
    let table = ParseTable::compute(grammar);
    println!("{}", table);
}
