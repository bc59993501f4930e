mod command;
mod keys;
mod util;
mod view;

fn main() -> anyhow::Result<()> {
    command::run()
}
