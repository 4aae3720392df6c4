//! Classes and their instances.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::debug;

use crate::error::{LoxError, Result};
use crate::function::{Callable, Function};
use crate::interpreter::Interpreter;
use crate::token::Token;
use crate::value::Value;

/// Name of the constructor method.
pub const INITIALIZER: &str = "init";

struct ClassData {
    name: String,
    superclass: Option<Class>,
    methods: HashMap<String, Rc<Function>>,
}

/// Shared handle to a class object.  Equality is identity.
#[derive(Clone)]
pub struct Class(Rc<ClassData>);

impl Class {
    pub fn new(
        name: String,
        superclass: Option<Class>,
        methods: HashMap<String, Rc<Function>>,
    ) -> Self {
        Class(Rc::new(ClassData {
            name,
            superclass,
            methods,
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Own methods first, then the superclass chain.
    pub fn find_method(&self, name: &str) -> Option<Rc<Function>> {
        if let Some(method) = self.0.methods.get(name) {
            return Some(Rc::clone(method));
        }

        self.0
            .superclass
            .as_ref()
            .and_then(|superclass| superclass.find_method(name))
    }

    pub fn ptr_eq(&self, other: &Class) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Callable for Class {
    fn arity(&self) -> usize {
        self.find_method(INITIALIZER)
            .map_or(0, |initializer| initializer.arity())
    }

    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Value>) -> Result<Value> {
        debug!("Instantiating class '{}'", self.name());

        let instance = Instance::new(self.clone());

        if let Some(initializer) = self.find_method(INITIALIZER) {
            initializer.bind(&instance).call(interpreter, arguments)?;
        }

        Ok(Value::Instance(instance))
    }
}

struct InstanceData {
    class: Class,
    fields: RefCell<HashMap<String, Value>>,
}

/// Shared handle to an instance.  Equality is identity.
#[derive(Clone)]
pub struct Instance(Rc<InstanceData>);

impl Instance {
    pub fn new(class: Class) -> Self {
        Instance(Rc::new(InstanceData {
            class,
            // An empty HashMap does not allocate until the first field write.
            fields: RefCell::new(HashMap::new()),
        }))
    }

    pub fn class(&self) -> &Class {
        &self.0.class
    }

    /// Fields shadow methods; methods come back bound to this instance.
    pub fn get(&self, name: &Token) -> Result<Value> {
        if let Some(value) = self.0.fields.borrow().get(&name.lexeme) {
            return Ok(value.clone());
        }

        if let Some(method) = self.0.class.find_method(&name.lexeme) {
            return Ok(Value::Function(Rc::new(method.bind(self))));
        }

        Err(LoxError::runtime(
            name,
            format!("Undefined property '{}'.", name.lexeme),
        ))
    }

    /// Writes always land in the instance's own fields.
    pub fn set(&self, name: &Token, value: Value) {
        self.0
            .fields
            .borrow_mut()
            .insert(name.lexeme.clone(), value);
    }

    pub fn ptr_eq(&self, other: &Instance) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}
