use bindery::{register, Construct, Error, Registry, Shared};

struct Salutation {
    prefix: &'static str,
}

trait Greeter: Send + Sync {
    fn greet(&self, name: &str) -> String;
}

struct ConsoleGreeter {
    salutation: Shared<Salutation>,
}

impl Greeter for ConsoleGreeter {
    fn greet(&self, name: &str) -> String {
        format!("{}, {}!", self.salutation.prefix, name)
    }
}

impl Construct for ConsoleGreeter {
    fn construct(registry: &Registry) -> Result<Self, Error> {
        Ok(Self {
            salutation: registry.resolve::<Salutation>()?,
        })
    }
}

fn main() {
    let registry = Registry::new();
    register!(registry, instance Salutation { prefix: "Hello" });
    register!(registry, transient dyn Greeter => ConsoleGreeter);

    let greeter = registry.resolve::<dyn Greeter>().unwrap();
    println!("{}", greeter.greet("world"));
    println!("Registry: {:?}", registry);
}
