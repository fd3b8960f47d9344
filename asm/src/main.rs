use clap::Parser;
use color_print::cprintln;

use mxasm::error::Error;
use mxasm::output::{self, Format};
use mxasm::passes;

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {author}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(author, version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Input file
    #[clap(short, long)]
    input: String,

    /// Output file
    #[clap(short, long)]
    output: String,

    /// Output format
    #[clap(short, long, value_enum, default_value_t = Format::Binary)]
    format: Format,
}

fn main() {
    let args: Args = Args::parse();
    println!("MX16 Assembler");

    println!("1. Read Source");
    println!("  < {}", args.input);
    let source = match std::fs::read_to_string(&args.input) {
        Ok(source) => source,
        Err(e) => fail(Error::FileOpen(args.input.clone(), e)),
    };

    println!("2. Assemble");
    let insns = match passes::assemble(&source) {
        Ok(insns) => insns,
        Err(e) => {
            e.print_diag(&args.input);
            std::process::exit(1);
        }
    };

    println!("3. Write Output");
    println!("  > {}", args.output);
    let mut file = match std::fs::File::create(&args.output) {
        Ok(file) => file,
        Err(e) => fail(Error::FileCreate(args.output.clone(), e)),
    };
    let written = match args.format {
        Format::Binary => output::write_binary(&mut file, &insns),
        Format::Logisim => output::write_logisim(&mut file, &insns),
    };
    if let Err(e) = written {
        fail(Error::FileWrite(args.output.clone(), e));
    }
}

fn fail(e: Error) -> ! {
    cprintln!("<red,bold>error</>: {}", e);
    std::process::exit(1)
}
