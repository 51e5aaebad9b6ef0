use crate::error::DecisionError;
use std::slice::Iter;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BTResult {
    Success,
    Failure,
    Pending,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BTDecoratorResult {
    Success,
    Failure,
}

pub type TickResult = Result<BTResult, DecisionError>;

pub type BoxedNode<T> = Box<dyn BTNode<T> + Send + Sync>;
pub type BoxedDecorator<T> = Box<dyn BTDecorator<T> + Send + Sync>;

pub struct BehaviorTree<T> {
    blackboard: T,
    root: BoxedNode<T>,
}

impl<T> BehaviorTree<T> {
    pub fn new(root: BoxedNode<T>, blackboard: T) -> BehaviorTree<T> {
        BehaviorTree { blackboard, root }
    }

    pub fn reset(&mut self) {
        self.root.reset();
    }

    pub fn tick(&mut self) -> TickResult {
        self.root.tick(&mut self.blackboard)
    }

    pub fn blackboard(&self) -> &T {
        &self.blackboard
    }

    pub fn blackboard_mut(&mut self) -> &mut T {
        &mut self.blackboard
    }
}

pub trait BTNode<T> {
    fn name(&self) -> &'static str;

    fn reset(&mut self);

    fn tick(&mut self, blackboard: &mut T) -> TickResult {
        if let BTDecoratorResult::Failure = self.check_decorators(blackboard)? {
            return Ok(BTResult::Failure);
        }

        self.internal_tick(blackboard)
    }

    fn internal_tick(&mut self, blackboard: &mut T) -> TickResult;

    fn get_decorators(&self) -> Iter<'_, BoxedDecorator<T>>;

    /// Decorators are evaluated in order and stop at the first failure.
    fn check_decorators(&self, blackboard: &T) -> Result<BTDecoratorResult, DecisionError> {
        for decorator in self.get_decorators() {
            if let BTDecoratorResult::Failure = decorator.evaluate(blackboard)? {
                return Ok(BTDecoratorResult::Failure);
            }
        }

        Ok(BTDecoratorResult::Success)
    }
}

pub trait BTDecorator<T> {
    fn evaluate(&self, blackboard: &T) -> Result<BTDecoratorResult, DecisionError>;
}

type Predicate<T> = Box<dyn Fn(&T) -> Result<bool, DecisionError> + Send + Sync>;

/// Decorator that lets a node run only while a predicate holds.
pub struct BTGuard<T> {
    predicate: Predicate<T>,
}

impl<T> BTGuard<T> {
    pub fn new<F>(predicate: F) -> BoxedDecorator<T>
    where
        F: Fn(&T) -> Result<bool, DecisionError> + Send + Sync + 'static,
        T: 'static,
    {
        Box::new(BTGuard {
            predicate: Box::new(predicate),
        })
    }
}

impl<T> BTDecorator<T> for BTGuard<T> {
    fn evaluate(&self, blackboard: &T) -> Result<BTDecoratorResult, DecisionError> {
        Ok(if (self.predicate)(blackboard)? {
            BTDecoratorResult::Success
        } else {
            BTDecoratorResult::Failure
        })
    }
}

pub mod action;
pub mod selector;

pub use action::BTAction;
pub use selector::BTSelector;
