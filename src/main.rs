fn main() -> anyhow::Result<()> {
    let command_line_interface = typegram::cli::CommandLineInterface::load();
    command_line_interface.run()
}
