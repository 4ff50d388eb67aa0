use clap::{arg,crate_version,ArgGroup,Command};
use rskpack::rsk;
use std::path::Path;

const RCH: &str = "unreachable was reached";

fn main() -> Result<(),Box<dyn std::error::Error>>
{
    env_logger::init();
    let long_help =
"Examples:
---------
Compress:      `rskpack my_file.txt -c` writes my_file.rsk
Decompress:    `rskpack my_file.rsk -d` writes decompressed_my_file.txt";

    let main_cmd = Command::new("rskpack")
        .about("Compress and expand files with the rsk container")
        .after_long_help(long_help)
        .version(crate_version!())
        .arg(arg!(<PATH> "input path"))
        .arg(arg!(-c --compress "compress the file").short_alias('C'))
        .arg(arg!(-d --decompress "expand a compressed file").short_alias('D'))
        .group(ArgGroup::new("mode").args(["compress","decompress"]).required(true));

    let matches = main_cmd.get_matches();
    let path = matches.get_one::<String>("PATH").expect(RCH);

    if matches.get_flag("compress") {
        let (in_size,out_size) = rsk::compress_file(Path::new(path))?;
        println!("Compression complete");
        println!("Initial size: {} bytes",in_size);
        println!("Final size: {} bytes",out_size);
        println!("Compression ratio: {:.2}%",100.0 * out_size as f64 / in_size as f64);
    }

    if matches.get_flag("decompress") {
        let (in_size,out_size) = rsk::expand_file(Path::new(path))?;
        println!("Decompression complete");
        println!("Initial size: {} bytes",in_size);
        println!("Final size: {} bytes",out_size);
    }

    Ok(())
}
