fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Only rerun if proto files change
    println!("cargo:rerun-if-changed=proto/shippy/consignment.proto");
    println!("cargo:rerun-if-changed=proto/shippy/vessel.proto");

    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(
            &[
                "proto/shippy/consignment.proto",
                "proto/shippy/vessel.proto",
            ],
            &["proto"],
        )?;
    Ok(())
}
